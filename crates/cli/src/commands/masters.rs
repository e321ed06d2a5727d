//! `partflow masters` -- supplier/part/customer quick-add and listing.

use super::{emit, field};
use crate::client::ApiClient;
use crate::{MasterKindArg, OutputFormat};

impl MasterKindArg {
    fn add_path(self) -> &'static str {
        match self {
            MasterKindArg::Suppliers => "/api/add-supplier",
            MasterKindArg::Parts => "/api/add-part",
            MasterKindArg::Customers => "/api/add-customer",
        }
    }

    fn list_path(self) -> &'static str {
        match self {
            MasterKindArg::Suppliers => "/api/suppliers",
            MasterKindArg::Parts => "/api/parts",
            MasterKindArg::Customers => "/api/customers-list",
        }
    }
}

pub(crate) fn cmd_add(
    api: &ApiClient,
    kind: MasterKindArg,
    name: &str,
    output: OutputFormat,
    quiet: bool,
) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("error: name must not be blank".to_string());
    }

    let body = serde_json::json!({ "name": name });
    let record = api.post(kind.add_path(), &body)?;

    emit(
        || format!("added {}", field(&record, "name")),
        &record,
        output,
        quiet,
    );
    Ok(())
}

pub(crate) fn cmd_list(
    api: &ApiClient,
    kind: MasterKindArg,
    output: OutputFormat,
    quiet: bool,
) -> Result<(), String> {
    let list = api.get(kind.list_path())?;
    let rows = list.as_array().cloned().unwrap_or_default();

    emit(
        || {
            if rows.is_empty() {
                return "no entries".to_string();
            }
            rows.iter()
                .map(|r| field(r, "name").to_string())
                .collect::<Vec<_>>()
                .join("\n")
        },
        &list,
        output,
        quiet,
    );
    Ok(())
}
