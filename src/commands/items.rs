use super::money;
use crate::core::{compute_totals, AppendOutcome, Reconciled, RemoteClear, RowSource};
use crate::model::{NewRow, UnitType};
use crate::Session;
use clap::Args;
use std::fmt::Write;

#[derive(Args, Debug, Clone)]
pub struct AddArgs {
    /// Item name
    pub item: String,
    #[arg(short, long)]
    pub quantity: f64,
    /// unit, package, kilogram or liter
    #[arg(short, long, default_value = "unit", value_parser = parse_unit)]
    pub unit: UnitType,
    /// Unit price
    #[arg(short, long)]
    pub price: f64,
    #[arg(short, long, default_value = "")]
    pub brand: String,
    /// Weight or volume, e.g. 1kg, 500ml
    #[arg(short, long, default_value = "")]
    pub note: String,
}

fn parse_unit(s: &str) -> Result<UnitType, String> {
    match UnitType::parse(s) {
        UnitType::Other(label) => Err(format!(
            "unknown unit `{}` (expected unit, package, kilogram or liter)",
            label
        )),
        unit => Ok(unit),
    }
}

pub async fn list_items(session: &mut Session) -> String {
    let Session { app, state } = session;
    let fetched = app.table.fetch_rows(state).await;
    let totals = compute_totals(&fetched.rows);

    let mut out = String::new();
    if let RowSource::Fallback(reason) = &fetched.source {
        let _ = writeln!(out, "Offline mode, showing items saved on this device ({})", reason);
    }

    if fetched.rows.is_empty() {
        out.push_str("The list is empty.\n");
    }
    for (i, row) in fetched.rows.iter().enumerate() {
        let brand = if row.brand.is_empty() {
            String::new()
        } else {
            format!(" ({})", row.brand)
        };
        let note = if row.note.is_empty() {
            String::new()
        } else {
            format!(" [{}]", row.note)
        };
        let _ = writeln!(
            out,
            "{:>3}. {}{} {} {}{}  {} each, {}  ({})",
            i + 1,
            row.item,
            brand,
            row.quantity,
            row.unit_type,
            note,
            money(row.price.or_zero()),
            money(row.line_total()),
            row.timestamp,
        );
    }

    let _ = write!(out, "Items: {}  Total: {}", totals.count, money(totals.sum));
    out
}

pub async fn add_item(session: &mut Session, args: AddArgs) -> Result<String, String> {
    let new_row = NewRow::new(args.item, args.quantity, args.unit, args.price)
        .map_err(|e| e.to_string())?
        .with_brand(args.brand)
        .with_note(args.note);

    let Session { app, state } = session;
    let outcome = app.table.append_row(state, new_row).await;

    let message = match &outcome {
        AppendOutcome::Stored { row, reconcile } => {
            let mut message = format!("Added {}.", row.item);
            match reconcile {
                Ok(Reconciled::Replayed(n)) => {
                    let _ = write!(message, " Synced {} item(s) saved while offline.", n);
                }
                Ok(Reconciled::Idle) => {}
                Err(e) => {
                    let _ = write!(message, "\nWarning: {}", e);
                }
            }
            message
        }
        AppendOutcome::Buffered { row, reason } => format!(
            "Saved {} on this device only; it will sync when the store is reachable ({}).",
            row.item, reason
        ),
    };
    Ok(message)
}

pub async fn clear_items(session: &mut Session) -> String {
    let Session { app, state } = session;
    let outcome = app.table.clear_table(state).await;
    match outcome.remote {
        RemoteClear::Cleared => "List cleared.".to_string(),
        RemoteClear::Skipped => "Offline: cleared the items on this device only.".to_string(),
        RemoteClear::Failed(e) => format!(
            "Cleared the items on this device, but the remote list could not be cleared: {}",
            e
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TableConfig;
    use crate::testing::FlakyStore;
    use crate::AppState;

    fn session(store: &std::sync::Arc<FlakyStore>) -> Session {
        AppState::with_store(".".into(), TableConfig::default(), store.clone()).start_session()
    }

    fn args(item: &str, quantity: f64, price: f64) -> AddArgs {
        AddArgs {
            item: item.into(),
            quantity,
            unit: UnitType::Kilogram,
            price,
            brand: "Tio João".into(),
            note: String::new(),
        }
    }

    #[test]
    fn test_parse_unit() {
        assert_eq!(parse_unit("kg"), Ok(UnitType::Kilogram));
        assert!(parse_unit("dozen").is_err());
    }

    #[tokio::test]
    async fn test_add_and_list() {
        let store = FlakyStore::new();
        let mut session = session(&store);

        let message = add_item(&mut session, args("Rice", 2.0, 8.5)).await.unwrap();
        assert_eq!(message, "Added Rice.");

        let listing = list_items(&mut session).await;
        assert!(listing.contains("Rice (Tio João) 2 Kilogram"));
        assert!(listing.contains("R$ 8.50 each, R$ 17.00"));
        assert!(listing.ends_with("Items: 1  Total: R$ 8.50"));
    }

    #[tokio::test]
    async fn test_add_offline_then_sync_on_next_add() {
        let store = FlakyStore::new();
        let mut session = session(&store);

        store.set_reachable(false);
        let message = add_item(&mut session, args("Rice", 2.0, 8.5)).await.unwrap();
        assert!(message.starts_with("Saved Rice on this device only"));
        assert!(list_items(&mut session).await.starts_with("Offline mode"));

        store.set_reachable(true);
        let message = add_item(&mut session, args("Beans", 1.0, 7.0)).await.unwrap();
        assert_eq!(message, "Added Beans. Synced 1 item(s) saved while offline.");
    }

    #[tokio::test]
    async fn test_add_rejects_invalid_input() {
        let store = FlakyStore::new();
        let mut session = session(&store);

        let err = add_item(&mut session, args("Rice", 0.0, 8.5)).await.unwrap_err();
        assert!(err.contains("quantity"));
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn test_clear_messages() {
        let store = FlakyStore::new();
        let mut session = session(&store);
        add_item(&mut session, args("Rice", 2.0, 8.5)).await.unwrap();

        assert_eq!(clear_items(&mut session).await, "List cleared.");
        assert_eq!(list_items(&mut session).await, "The list is empty.\nItems: 0  Total: R$ 0.00");
    }
}
