/// Unit tests for schema adaptation, filtering and statistics
use serde_json::json;
use whatsblast::models::{Prospect, SourceProspect, ZoneValue};
use whatsblast::store::{ProspectStore, ViewMode};

fn source(id: &str, name: &str, phone: Option<&str>, zone: Option<&str>) -> SourceProspect {
    SourceProspect {
        id: id.to_string(),
        name: name.to_string(),
        phone: phone.map(str::to_string),
        email: None,
        zone: zone.map(|z| ZoneValue::One(z.to_string())),
        income: None,
        extra: serde_json::Map::new(),
    }
}

fn store_with(zones: &[(&str, Option<&str>)]) -> ProspectStore {
    let prospects = zones
        .iter()
        .enumerate()
        .map(|(i, (name, zone))| {
            Prospect::from_source(&source(&format!("p{}", i + 1), name, Some("5551234"), *zone))
        })
        .collect();
    ProspectStore::new(prospects, vec!["zone".to_string()])
}

#[cfg(test)]
mod adaptation_tests {
    use super::*;

    #[test]
    fn test_name_split_on_first_space() {
        let p = Prospect::from_source(&source("1", "Ana María Pérez", None, None));
        assert_eq!(p.first_name, "Ana");
        assert_eq!(p.last_name, "María Pérez");

        let single = Prospect::from_source(&source("2", "Ana", None, None));
        assert_eq!(single.first_name, "Ana");
        assert_eq!(single.last_name, "");
    }

    #[test]
    fn test_phone_digits_only() {
        let p = Prospect::from_source(&source("1", "Ana", Some("+52 (55) 1234-5678"), None));
        assert_eq!(p.phone, "525512345678");

        let none = Prospect::from_source(&source("2", "Luis", None, None));
        assert_eq!(none.phone, "");
    }

    #[test]
    fn test_zone_list_joined() {
        let mut s = source("1", "Ana", None, None);
        s.zone = Some(ZoneValue::Many(vec!["Norte".into(), "Centro".into()]));
        let p = Prospect::from_source(&s);
        assert_eq!(p.extras["zone"], "Norte, Centro");

        let empty = Prospect::from_source(&source("2", "Luis", None, None));
        assert_eq!(empty.extras["zone"], "");
    }

    #[test]
    fn test_income_formatted_as_currency() {
        let mut s = source("1", "Ana", None, None);
        s.income = Some(1_500_000.0);
        let p = Prospect::from_source(&s);
        assert_eq!(p.extras["income"], "$1,500,000");

        let absent = Prospect::from_source(&source("2", "Luis", None, None));
        assert_eq!(absent.extras["income"], "");
    }

    #[test]
    fn test_extra_fields_survive_adaptation() {
        let mut s = source("1", "Ana", None, None);
        s.extra.insert("interes".to_string(), json!("departamento"));
        s.extra.insert("visitas".to_string(), json!(3));
        s.extra.insert("nested".to_string(), json!({"drop": true}));
        let p = Prospect::from_source(&s);
        assert_eq!(p.extras["interes"], "departamento");
        assert_eq!(p.extras["visitas"], "3");
        assert!(!p.extras.contains_key("nested"));
    }

    #[test]
    fn test_record_exposes_template_keys() {
        let p = Prospect::from_source(&source("1", "Ana Pérez", Some("555123"), Some("Norte")));
        let record = p.record();
        assert_eq!(record["nombre"], "Ana");
        assert_eq!(record["apellido"], "Pérez");
        assert_eq!(record["telefono"], "555123");
        assert_eq!(record["zone"], "Norte");
    }

    #[test]
    fn test_source_with_unknown_fields_deserializes() {
        let raw = json!({
            "id": "x1",
            "name": "Ana Pérez",
            "zone": ["Norte", "Sur"],
            "income": 980.5,
            "presupuesto": "alto"
        });
        let s: SourceProspect = serde_json::from_value(raw).unwrap();
        let p = Prospect::from_source(&s);
        assert_eq!(p.extras["zone"], "Norte, Sur");
        assert_eq!(p.extras["income"], "$980.50");
        assert_eq!(p.extras["presupuesto"], "alto");
    }
}

#[cfg(test)]
mod filtering_tests {
    use super::*;

    #[test]
    fn test_filters_and_across_columns() {
        let prospects = vec![
            Prospect::from_source(&source("p1", "Ana", Some("1"), Some("Norte"))),
            Prospect::from_source(&source("p2", "Luis", Some("2"), Some("Sur"))),
            Prospect::from_source(&source("p3", "Eva", Some("3"), Some("Norte"))),
        ];
        let mut store = ProspectStore::new(prospects, vec!["zone".into(), "nombre".into()]);

        store.set_filter("zone", "Norte").unwrap();
        store.set_filter("nombre", "Eva").unwrap();
        let visible = store.visible(ViewMode::Pending);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, "p3");
    }

    #[test]
    fn test_empty_filter_value_clears() {
        let mut store = store_with(&[("Ana", Some("Norte")), ("Luis", Some("Sur"))]);
        store.set_filter("zone", "Norte").unwrap();
        assert_eq!(store.visible(ViewMode::Pending).len(), 1);
        store.set_filter("zone", "").unwrap();
        assert_eq!(store.visible(ViewMode::Pending).len(), 2);
        assert!(store.filters().is_empty());
    }

    #[test]
    fn test_undeclared_column_rejected() {
        let mut store = store_with(&[("Ana", Some("Norte"))]);
        assert!(store.set_filter("income", "$0").is_err());
    }

    #[test]
    fn test_prospect_without_column_fails_match() {
        let mut store = store_with(&[("Ana", Some("Norte")), ("Luis", None)]);
        store.set_filter("zone", "Norte").unwrap();
        let visible = store.visible(ViewMode::Pending);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].first_name, "Ana");
    }

    #[test]
    fn test_source_order_preserved() {
        let mut store = store_with(&[
            ("Eva", Some("Norte")),
            ("Ana", Some("Norte")),
            ("Luis", Some("Norte")),
        ]);
        store.set_filter("zone", "Norte").unwrap();
        let names: Vec<_> = store
            .visible(ViewMode::Pending)
            .iter()
            .map(|p| p.first_name.clone())
            .collect();
        assert_eq!(names, ["Eva", "Ana", "Luis"]);
    }

    #[test]
    fn test_filter_options_distinct_sorted_non_empty() {
        let store = store_with(&[
            ("Ana", Some("Sur")),
            ("Luis", Some("Norte")),
            ("Eva", Some("Sur")),
            ("Mar", None),
        ]);
        let options = store.filter_options();
        assert_eq!(options["zone"], ["Norte", "Sur"]);
    }
}

#[cfg(test)]
mod stats_tests {
    use super::*;

    #[test]
    fn test_pending_is_total_minus_sent() {
        let mut store = store_with(&[
            ("Ana", Some("Norte")),
            ("Luis", Some("Sur")),
            ("Eva", Some("Norte")),
        ]);
        store.mark_sent("p1");
        let stats = store.stats();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.pending, 2);
        assert_eq!(stats.sent_this_session, 1);
        assert_eq!(stats.contacted_total, 1);
    }

    #[test]
    fn test_filters_do_not_affect_stats() {
        let mut store = store_with(&[("Ana", Some("Norte")), ("Luis", Some("Sur"))]);
        store.set_filter("zone", "Norte").unwrap();
        let stats = store.stats();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.pending, 2);
    }

    #[test]
    fn test_progress_rounds_and_handles_empty_list() {
        let empty = ProspectStore::new(Vec::new(), vec!["zone".into()]);
        assert_eq!(empty.stats().progress_pct, 0);

        let mut store = store_with(&[
            ("A", None),
            ("B", None),
            ("C", None),
        ]);
        store.mark_sent("p1");
        // 1/3 -> 33.33 -> 33
        assert_eq!(store.stats().progress_pct, 33);
        store.mark_sent("p2");
        // 2/3 -> 66.67 -> 67
        assert_eq!(store.stats().progress_pct, 67);
    }

    #[test]
    fn test_mark_sent_is_idempotent() {
        let mut store = store_with(&[("Ana", None)]);
        assert!(store.mark_sent("p1"));
        assert!(!store.mark_sent("p1"));
        assert_eq!(store.stats().sent_this_session, 1);
    }

    #[test]
    fn test_spec_worked_example() {
        // 5 prospects, 2 sent, filter zone=Norte matching 3 (1 of them sent)
        let mut store = store_with(&[
            ("Ana", Some("Norte")),
            ("Luis", Some("Norte")),
            ("Eva", Some("Norte")),
            ("Mar", Some("Sur")),
            ("Sol", Some("Sur")),
        ]);
        store.mark_sent("p1"); // Norte, sent
        store.mark_sent("p4"); // Sur, sent
        store.set_filter("zone", "Norte").unwrap();

        assert_eq!(store.visible(ViewMode::Pending).len(), 2);
        assert_eq!(store.visible(ViewMode::Sent).len(), 1);
    }

    #[test]
    fn test_views_partition_filtered_list() {
        let mut store = store_with(&[("Ana", Some("Norte")), ("Luis", Some("Norte"))]);
        store.mark_sent("p2");
        let pending: Vec<_> = store
            .visible(ViewMode::Pending)
            .iter()
            .map(|p| p.id.clone())
            .collect();
        let sent: Vec<_> = store
            .visible(ViewMode::Sent)
            .iter()
            .map(|p| p.id.clone())
            .collect();
        assert_eq!(pending, ["p1"]);
        assert_eq!(sent, ["p2"]);
    }
}
