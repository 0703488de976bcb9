//! Deployable function records

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::duration::Duration;
use crate::error::{Result, require_non_empty};

/// Invocation timeout applied when the caller supplies none
pub const DEFAULT_TIMEOUT: Duration = Duration::seconds(30);

/// Body the function is created with; every pipeline run replaces it
/// out-of-band via the deploy stage.
pub const PLACEHOLDER_CODE: &str = "// Initial placeholder code";

/// Hosted function runtimes known to the toolkit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Runtime {
    Nodejs22,
}

impl Runtime {
    /// Provider identifier for the runtime
    pub fn id(&self) -> &'static str {
        match self {
            Self::Nodejs22 => "nodejs22.x",
        }
    }
}

/// A hosted function declared with placeholder content
///
/// The deploy stage of the release pipeline is the only actor that updates
/// its code after this declaration, and it does so at release time, not
/// here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Function {
    pub function_name: String,
    pub runtime: Runtime,
    pub handler: String,
    pub inline_code: String,
    pub timeout: Duration,
}

impl Function {
    /// Declare a function, falling back to [`DEFAULT_TIMEOUT`] when no
    /// timeout is supplied
    pub fn new(
        function_name: impl Into<String>,
        handler: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let function_name = function_name.into();
        let handler = handler.into();
        require_non_empty("function name", &function_name)?;
        require_non_empty("handler", &handler)?;

        Ok(Self {
            function_name,
            runtime: Runtime::Nodejs22,
            handler,
            inline_code: PLACEHOLDER_CODE.to_string(),
            timeout: timeout.unwrap_or(DEFAULT_TIMEOUT),
        })
    }

    pub(crate) fn render(&self) -> Value {
        json!({
            "Type": "AWS::Lambda::Function",
            "Properties": {
                "FunctionName": self.function_name,
                "Runtime": self.runtime.id(),
                "Handler": self.handler,
                "Code": { "ZipFile": self.inline_code },
                "Timeout": self.timeout.as_secs(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SynthError;

    #[test]
    fn test_default_timeout_is_thirty_seconds() {
        let function = Function::new("DdcLambda", "dist/main.handler", None).unwrap();
        assert_eq!(function.timeout, Duration::seconds(30));
    }

    #[test]
    fn test_supplied_timeout_wins() {
        let function =
            Function::new("DdcLambda", "dist/main.handler", Some(Duration::minutes(10))).unwrap();
        assert_eq!(function.timeout.as_secs(), 600);
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let result = Function::new("", "dist/main.handler", None);
        assert!(matches!(result, Err(SynthError::Validation(_))));
    }

    #[test]
    fn test_render_carries_placeholder_code() {
        let function = Function::new("DdcLambda", "dist/main.handler", None).unwrap();
        let rendered = function.render();
        assert_eq!(rendered["Type"], "AWS::Lambda::Function");
        assert_eq!(rendered["Properties"]["Code"]["ZipFile"], PLACEHOLDER_CODE);
        assert_eq!(rendered["Properties"]["Runtime"], "nodejs22.x");
        assert_eq!(rendered["Properties"]["Timeout"], 30);
    }
}
