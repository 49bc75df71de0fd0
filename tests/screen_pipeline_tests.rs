#[cfg(test)]
mod tests {
    use fitdesk::config::config::Config;
    use fitdesk::data::collection_view::compute_view;
    use fitdesk::data::data_exporter::{DataExporter, ExportScope};
    use fitdesk::data::filter_options::screen_filter_options;
    use fitdesk::data::query::{MissingValuePolicy, SortDirection};
    use fitdesk::data::record::{FieldValue, Record};
    use fitdesk::data::record_adapter::RecordAdapter;
    use fitdesk::data::screens::CollectionKind;
    use fitdesk::table_display::resolve_columns;
    use serde_json::json;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    /// Payments as three different endpoints spell them, under an envelope
    fn write_payments_file(dir: &TempDir) -> PathBuf {
        let payload = json!({
            "total": 3,
            "payments": [
                {
                    "id": 1,
                    "member": {"first_name": "Ana", "last_name": "Lee"},
                    "amount": "49.90",
                    "payment_method": "Visa",
                    "status": "Paid",
                    "payment_date": "2024-05-01"
                },
                {
                    "id": 2,
                    "memberName": "Ben Ortiz",
                    "amount": 120,
                    "method": "Cash",
                    "status": "pending",
                    "paidAt": "2024-05-03"
                },
                {
                    "id": 3,
                    "member": {"firstName": "Cleo", "lastName": "Park"},
                    "amount": null,
                    "paymentMethod": "visa",
                    "status": "paid",
                    "paymentDate": null
                }
            ]
        });

        let path = dir.path().join("payments.json");
        fs::write(&path, serde_json::to_string_pretty(&payload).unwrap()).unwrap();
        path
    }

    fn load_payments(dir: &TempDir) -> Vec<Record> {
        let path = write_payments_file(dir);
        RecordAdapter::for_kind(CollectionKind::Payments)
            .load_json_file(&path)
            .expect("Failed to load payments.json")
    }

    fn member_names(records: &[&Record]) -> Vec<String> {
        records
            .iter()
            .map(|r| r.display_value("memberName"))
            .collect()
    }

    #[test]
    fn test_adapter_normalizes_payment_shapes() {
        let dir = TempDir::new().unwrap();
        let records = load_payments(&dir);

        assert_eq!(records.len(), 3);
        for record in &records {
            assert!(record.contains_field("memberName"));
            assert!(record.contains_field("paymentMethod"));
            assert!(record.contains_field("paymentDate"));
        }

        assert_eq!(records[0].display_value("memberName"), "Ana Lee");
        assert_eq!(records[0].get("amount"), Some(&FieldValue::Float(49.9)));
        assert_eq!(
            records[1].get("paymentDate"),
            Some(&FieldValue::DateTime("2024-05-03".to_string()))
        );
        assert_eq!(records[1].display_value("paymentMethod"), "Cash");
        assert_eq!(records[2].display_value("memberName"), "Cleo Park");
        assert_eq!(records[2].get("amount"), Some(&FieldValue::Null));
    }

    #[test]
    fn test_initial_screen_params_sort_newest_first() {
        let dir = TempDir::new().unwrap();
        let records = load_payments(&dir);
        let preset = CollectionKind::Payments.preset();

        let params = preset.initial_params(10);
        assert_eq!(params.sort_direction, SortDirection::Descending);
        assert!(!params.has_active_filters());

        let view = compute_view(&records, &params);
        assert_eq!(
            member_names(&view.page_slice()),
            vec!["Ben Ortiz", "Ana Lee", "Cleo Park"]
        );
    }

    #[test]
    fn test_category_select_and_search_together() {
        let dir = TempDir::new().unwrap();
        let records = load_payments(&dir);
        let preset = CollectionKind::Payments.preset();

        let mut params = preset
            .initial_params(10)
            .with_filter("status", preset.filter_for("status", "PAID"));
        let view = compute_view(&records, &params);
        assert_eq!(member_names(&view.page_slice()), vec!["Ana Lee", "Cleo Park"]);

        params.search_term = "VISA".to_string();
        params = params.with_filter("status", preset.filter_for("status", "all"));
        let view = compute_view(&records, &params);
        assert_eq!(member_names(&view.page_slice()), vec!["Ana Lee", "Cleo Park"]);
    }

    #[test]
    fn test_amount_sort_uses_missing_value_policy() {
        let dir = TempDir::new().unwrap();
        let records = load_payments(&dir);
        let preset = CollectionKind::Payments.preset();

        let params = preset
            .initial_params(10)
            .with_sort("amount", SortDirection::Ascending);
        let view = compute_view(&records, &params);
        assert_eq!(
            member_names(&view.page_slice()),
            vec!["Cleo Park", "Ana Lee", "Ben Ortiz"]
        );

        let params = params.with_missing_values(MissingValuePolicy::SortLast);
        let view = compute_view(&records, &params);
        assert_eq!(
            member_names(&view.page_slice()),
            vec!["Ana Lee", "Ben Ortiz", "Cleo Park"]
        );
    }

    #[test]
    fn test_status_options_merge_case_variants() {
        let dir = TempDir::new().unwrap();
        let records = load_payments(&dir);
        let preset = CollectionKind::Payments.preset();

        let options = screen_filter_options(&records, preset);
        let (field, status_options) = &options[0];
        assert_eq!(*field, "status");

        let labels: Vec<(&str, usize)> = status_options
            .iter()
            .map(|o| (o.label.as_str(), o.count))
            .collect();
        assert_eq!(labels, vec![("All", 3), ("Paid", 2), ("pending", 1)]);
    }

    #[test]
    fn test_export_filtered_view_to_csv_and_json() {
        let dir = TempDir::new().unwrap();
        let records = load_payments(&dir);
        let preset = CollectionKind::Payments.preset();

        let params = preset
            .initial_params(1)
            .with_filter("status", preset.filter_for("status", "paid"));
        let view = compute_view(&records, &params);
        let columns = resolve_columns(Some(preset), &records);

        let csv_path = dir.path().join("paid.csv");
        let message =
            DataExporter::export_view_to_csv(&view, &columns, ExportScope::AllFiltered, &csv_path)
                .unwrap();
        assert!(message.contains("Exported 2 rows"));

        let csv_text = fs::read_to_string(&csv_path).unwrap();
        let lines: Vec<&str> = csv_text.lines().collect();
        assert_eq!(
            lines[0],
            "memberName,amount,paymentMethod,status,paymentDate"
        );
        assert_eq!(lines[1], "Ana Lee,49.9,Visa,Paid,2024-05-01");
        assert_eq!(lines[2], "Cleo Park,,visa,paid,");

        let json_path = dir.path().join("page.json");
        DataExporter::export_view_to_json(&view, ExportScope::CurrentPage, &json_path).unwrap();
        let exported: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
        let rows = exported.as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["memberName"], json!("Ana Lee"));
        assert_eq!(rows[0]["amount"], json!(49.9));
    }

    fn ids(records: &[&Record]) -> Vec<String> {
        records.iter().map(|r| r.display_value("id")).collect()
    }

    #[test]
    fn test_non_finite_amounts_sort_as_missing() {
        let records = RecordAdapter::for_kind(CollectionKind::Payments)
            .normalize_payload(json!([
                {"id": 1, "amount": "30"},
                {"id": 2, "amount": "NaN"},
                {"id": 3, "amount": "10"},
                {"id": 4, "amount": "20"},
                {"id": 5, "amount": "inf"}
            ]))
            .unwrap();

        assert_eq!(
            records[1].get("amount"),
            Some(&FieldValue::String("NaN".to_string()))
        );
        assert_eq!(
            records[4].get("amount"),
            Some(&FieldValue::String("inf".to_string()))
        );

        let params = CollectionKind::Payments
            .preset()
            .initial_params(10)
            .with_sort("amount", SortDirection::Ascending);
        let view = compute_view(&records, &params);
        assert_eq!(ids(&view.page_slice()), vec!["2", "5", "3", "4", "1"]);

        let params = params
            .with_sort("amount", SortDirection::Descending)
            .with_missing_values(MissingValuePolicy::SortLast);
        let view = compute_view(&records, &params);
        assert_eq!(ids(&view.page_slice()), vec!["1", "4", "3", "2", "5"]);
    }

    #[test]
    fn test_zoned_payment_dates_sort_by_instant() {
        let records = RecordAdapter::for_kind(CollectionKind::Payments)
            .normalize_payload(json!({
                "payments": [
                    {"id": 1, "payment_date": "2024-05-01T09:00:00+0200"},
                    {"id": 2, "payment_date": "2024-05-01T08:30Z"},
                    {"id": 3, "payment_date": "2024-05-01T10:00+02:00"},
                    {"id": 4, "payment_date": null}
                ]
            }))
            .unwrap();

        for record in &records[..3] {
            assert!(matches!(
                record.get("paymentDate"),
                Some(FieldValue::DateTime(_))
            ));
        }

        // Newest first: 08:30 UTC, 08:00 UTC, 07:00 UTC, then the missing date
        let params = CollectionKind::Payments.preset().initial_params(10);
        let view = compute_view(&records, &params);
        assert_eq!(ids(&view.page_slice()), vec!["2", "3", "1", "4"]);
    }

    #[test]
    fn test_config_file_drives_initial_params() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(
            &config_path,
            "[view]\ndefault_page_size = 2\nmissing_values = \"sort_last\"\n",
        )
        .unwrap();

        let config = Config::load_from(&config_path).unwrap();
        let params = config.view.apply_to(
            CollectionKind::Members
                .preset()
                .initial_params(config.view.default_page_size),
        );

        assert_eq!(params.page_size, 2);
        assert_eq!(params.missing_values, MissingValuePolicy::SortLast);
        assert_eq!(params.sort_field.as_deref(), Some("lastName"));
    }

    #[test]
    fn test_every_screen_loads_an_enveloped_payload() {
        for kind in CollectionKind::ALL {
            let payload = json!({
                "data": [
                    {"id": 1, "status": "active", "name": "first"},
                    {"id": 2, "status": "inactive", "name": "second"}
                ]
            });

            let records = RecordAdapter::for_kind(kind)
                .normalize_payload(payload)
                .unwrap();
            let params = kind.preset().initial_params(1);
            let view = compute_view(&records, &params);

            assert_eq!(view.total_filtered(), 2, "screen {}", kind);
            assert_eq!(view.total_pages(), 2, "screen {}", kind);
            assert_eq!(view.page_slice().len(), 1, "screen {}", kind);
        }
    }
}
