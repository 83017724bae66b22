//! Reference list commands
//!
//! Print the municipality or species list the export form offers.

use anyhow::Result;
use proposicoes_core::{ProposicaoApi, ReferenceItem, ReferenceKind};
use serde::Serialize;
use tabled::Tabled;

use crate::output::print_output;
use super::Context;

/// Reference row for table display
#[derive(Debug, Serialize, Tabled)]
pub struct ReferenceRow {
    #[tabled(rename = "ID")]
    pub id: i64,
    #[tabled(rename = "Name")]
    pub name: String,
}

impl From<ReferenceItem> for ReferenceRow {
    fn from(item: ReferenceItem) -> Self {
        Self {
            id: item.id,
            name: item.name,
        }
    }
}

pub async fn execute(ctx: &Context, kind: ReferenceKind) -> Result<()> {
    let api = ctx.api()?;
    let items = api
        .fetch_reference_list(kind)
        .await
        .map_err(|e| anyhow::anyhow!("Could not load {}: {}", kind.label(), e))?;

    let rows: Vec<ReferenceRow> = items.into_iter().map(ReferenceRow::from).collect();
    print_output(
        &rows,
        ctx.format,
        &format!("The API returned no {}.", kind.label()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_row_from_item() {
        let row = ReferenceRow::from(ReferenceItem {
            id: 9,
            name: "Rio Branco".to_string(),
        });
        assert_eq!(row.id, 9);
        assert_eq!(row.name, "Rio Branco");
    }

    #[test]
    fn test_reference_row_serialization() {
        let row = ReferenceRow {
            id: 2,
            name: "Projeto de Lei".to_string(),
        };
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"id":2,"name":"Projeto de Lei"}"#);
    }
}
