//! Handlers for attribute add, delete, and listing commands.

use poolctl_attr::catalog::ValueKind;
use poolctl_attr::codec;
use poolctl_data::AttributeStore;

use crate::cli::OutputFormat;
use crate::context::{CliError, CliResult};
use crate::output;

pub(crate) async fn add(
    store: &AttributeStore,
    keyword: &str,
    kind: ValueKind,
    value: &str,
) -> CliResult<()> {
    let resolved = codec::resolve(keyword, Some((kind, value)))?;
    store.add(&resolved).await?;
    println!(
        "added {keyword} attribute ({}).",
        output::type_label(resolved.type_code)
    );
    Ok(())
}

pub(crate) async fn del(
    store: &AttributeStore,
    keyword: &str,
    value: Option<(ValueKind, &str)>,
) -> CliResult<()> {
    let resolved = codec::resolve(keyword, value)?;
    let deleted = store.delete_matching(&resolved).await?;
    if deleted.is_empty() {
        return Err(CliError::not_found(output::describe_no_match(
            keyword, &resolved,
        )));
    }
    for record in &deleted {
        println!("{}", output::describe_deleted(keyword, record));
    }
    Ok(())
}

pub(crate) async fn list(store: &AttributeStore, format: OutputFormat) -> CliResult<()> {
    let records = store.list().await?;
    output::render_attribute_list(&records, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use poolctl_attr::types;
    use poolctl_test_support::sqlite::memory_pool;

    async fn store() -> AttributeStore {
        let pool = memory_pool().await.expect("open pool");
        AttributeStore::new(pool).await.expect("init store")
    }

    #[tokio::test]
    async fn add_persists_resolved_attribute() {
        let store = store().await;
        add(&store, "dns", ValueKind::Address, "8.8.8.8")
            .await
            .expect("add");

        let records = store.list().await.expect("list");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].type_code, types::INTERNAL_IP4_DNS);
    }

    #[tokio::test]
    async fn add_rejects_unknown_keyword() {
        let store = store().await;
        let err = add(&store, "foobar", ValueKind::Hex, "2a")
            .await
            .expect_err("unknown keyword");
        assert!(matches!(err, CliError::Validation(_)));
    }

    #[tokio::test]
    async fn del_reports_not_found_on_empty_match() {
        let store = store().await;
        let err = del(&store, "banner", None).await.expect_err("empty store");
        assert!(matches!(err, CliError::NotFound(_)));
        assert_eq!(err.exit_code(), 1);
    }

    #[tokio::test]
    async fn del_removes_both_families_for_bare_keyword() {
        let store = store().await;
        add(&store, "dns", ValueKind::Address, "8.8.8.8")
            .await
            .expect("add v4");
        add(&store, "dns", ValueKind::Address, "2001:db8::1")
            .await
            .expect("add v6");

        del(&store, "dns", None).await.expect("del");
        assert!(store.list().await.expect("list").is_empty());
    }
}
