//! Key-value table records

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::{Result, require_non_empty};

/// Attribute types a key column can take
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeType {
    String,
    Number,
    Binary,
}

impl AttributeType {
    fn code(&self) -> &'static str {
        match self {
            Self::String => "S",
            Self::Number => "N",
            Self::Binary => "B",
        }
    }
}

/// Billing modes for a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BillingMode {
    PayPerRequest,
    Provisioned,
}

impl BillingMode {
    fn code(&self) -> &'static str {
        match self {
            Self::PayPerRequest => "PAY_PER_REQUEST",
            Self::Provisioned => "PROVISIONED",
        }
    }
}

/// Partition key of a table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartitionKey {
    pub name: String,
    pub attribute_type: AttributeType,
}

/// A key-value table declaration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    pub table_name: String,
    pub partition_key: PartitionKey,
    pub billing_mode: BillingMode,
}

impl Table {
    pub fn new(
        table_name: impl Into<String>,
        partition_key: PartitionKey,
        billing_mode: BillingMode,
    ) -> Result<Self> {
        let table_name = table_name.into();
        require_non_empty("table name", &table_name)?;
        require_non_empty("partition key name", &partition_key.name)?;

        Ok(Self {
            table_name,
            partition_key,
            billing_mode,
        })
    }

    pub(crate) fn render(&self) -> Value {
        json!({
            "Type": "AWS::DynamoDB::Table",
            "Properties": {
                "TableName": self.table_name,
                "AttributeDefinitions": [{
                    "AttributeName": self.partition_key.name,
                    "AttributeType": self.partition_key.attribute_type.code(),
                }],
                "KeySchema": [{
                    "AttributeName": self.partition_key.name,
                    "KeyType": "HASH",
                }],
                "BillingMode": self.billing_mode.code(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SynthError;

    fn pk() -> PartitionKey {
        PartitionKey {
            name: "pk".to_string(),
            attribute_type: AttributeType::String,
        }
    }

    #[test]
    fn test_render_pay_per_request_table() {
        let table = Table::new("DDCTable", pk(), BillingMode::PayPerRequest).unwrap();
        let rendered = table.render();
        assert_eq!(rendered["Properties"]["TableName"], "DDCTable");
        assert_eq!(rendered["Properties"]["BillingMode"], "PAY_PER_REQUEST");
        assert_eq!(rendered["Properties"]["KeySchema"][0]["AttributeName"], "pk");
        assert_eq!(rendered["Properties"]["AttributeDefinitions"][0]["AttributeType"], "S");
    }

    #[test]
    fn test_empty_table_name_is_rejected() {
        let result = Table::new("  ", pk(), BillingMode::PayPerRequest);
        assert!(matches!(result, Err(SynthError::Validation(_))));
    }
}
