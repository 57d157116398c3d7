use std::collections::BTreeMap;

use rowkit_io_xlsx::{
    EnumCellValue, EnumSheetRowKind, Json, RowkitError, SheetRecord, SpecSheetWriteConfig,
    derive_sheet_schema, marshal_records, write_records,
};
use serde::Serialize;

#[derive(SheetRecord)]
struct Untagged {
    first: u32,
    second: String,
    third: f64,
}

#[derive(Serialize)]
struct Address {
    street: String,
    city: String,
}

#[derive(SheetRecord)]
#[sheet(sheet_name = "Customers", start_row = 1, configure = "configure_customers")]
struct Customer {
    #[sheet(excel = "Customer ID", type = "int")]
    id: u64,
    #[sheet(excel = "Name", type = "string", label = "Full name")]
    name: String,
    email: Option<String>,
    #[sheet(excel = "Address", type = "json")]
    address: Json<Address>,
    #[sheet(encoder = "json")]
    note: String,
    r#type: char,
}

fn configure_customers(_record: &Customer, config: &mut SpecSheetWriteConfig) {
    config.leading_row_texts = vec!["customer export".to_string()];
    config.set_comment("email", "optional contact");
}

fn customer(id: u64, email: Option<&str>) -> Customer {
    Customer {
        id,
        name: format!("name-{id}"),
        email: email.map(ToString::to_string),
        address: Json(Address {
            street: "Main".to_string(),
            city: "Oslo".to_string(),
        }),
        note: "vip".to_string(),
        r#type: 'B',
    }
}

#[derive(SheetRecord)]
struct Labeled<T: rowkit_io_xlsx::ToFieldValue> {
    #[sheet(excel = "Label")]
    label: &'static str,
    value: T,
}

#[derive(SheetRecord)]
struct Unserializable {
    key: u8,
    #[sheet(type = "json")]
    payload: Json<BTreeMap<(u8, u8), u8>>,
}

#[derive(SheetRecord)]
struct LedgerEntry {
    #[sheet(excel = "Entry ID")]
    id: u64,
    delta: i64,
}

#[test]
fn untagged_struct_emits_header_type_and_one_row_per_record() {
    let records = vec![
        Untagged {
            first: 1,
            second: "a".to_string(),
            third: 0.5,
        },
        Untagged {
            first: 2,
            second: "b".to_string(),
            third: 1.5,
        },
    ];

    let (sink, report) = marshal_records(&records).expect("marshal");

    assert_eq!(sink.rows.len(), 2 + records.len());
    assert_eq!(sink.texts()[0], vec!["first", "second", "third"]);
    assert_eq!(sink.texts()[1], vec!["", "", ""]);
    assert_eq!(
        sink.rows[3].cells,
        vec![
            EnumCellValue::Number(2.0),
            EnumCellValue::String("b".to_string()),
            EnumCellValue::Number(1.5),
        ]
    );
    assert_eq!(report.sheet_name, "Sheet1");
}

#[test]
fn derived_schema_reads_tags_kinds_and_raw_identifiers() {
    let schema = derive_sheet_schema::<Customer>(&SpecSheetWriteConfig::default());
    assert_eq!(
        schema.display_names(),
        vec!["Customer ID", "Name", "email", "Address", "note", "type"]
    );
    assert_eq!(
        schema
            .columns
            .iter()
            .map(|col| col.kind.as_str())
            .collect::<Vec<_>>(),
        vec!["plain", "plain", "plain", "json", "json", "plain"]
    );

    let config = SpecSheetWriteConfig {
        tag_name_key: "label".to_string(),
        ..Default::default()
    };
    let schema = derive_sheet_schema::<Customer>(&config);
    assert_eq!(schema.columns[1].display_name, "Full name");
    assert_eq!(schema.columns[0].display_name, "id");
}

#[test]
fn container_attributes_and_configure_fn_shape_the_sheet() {
    let records = vec![customer(7, Some("c@example.com")), customer(8, None)];
    let (sink, report) = marshal_records(&records).expect("marshal");

    assert_eq!(report.sheet_name, "Customers");
    assert_eq!(
        sink.rows.iter().map(|row| row.kind).collect::<Vec<_>>(),
        vec![
            EnumSheetRowKind::Leading,
            EnumSheetRowKind::Comment,
            EnumSheetRowKind::Header,
            EnumSheetRowKind::Type,
            EnumSheetRowKind::Data,
            EnumSheetRowKind::Data,
        ]
    );

    let l_texts = sink.texts();
    assert_eq!(l_texts[0], vec!["customer export"]);
    assert_eq!(l_texts[1], vec!["", "", "optional contact", "", "", ""]);
    assert_eq!(l_texts[3], vec!["int", "string", "", "json", "", ""]);
    assert_eq!(
        l_texts[4],
        vec![
            "7",
            "name-7",
            "c@example.com",
            r#"{"street":"Main","city":"Oslo"}"#,
            r#""vip""#,
            "B",
        ]
    );
    assert_eq!(sink.rows[5].cells[2], EnumCellValue::None);
    assert_eq!(l_texts[5][3], r#"{"street":"Main","city":"Oslo"}"#);
}

#[test]
fn generic_record_uses_field_type_kind() {
    let records = vec![
        Labeled {
            label: "answer",
            value: Json(vec![4, 2]),
        },
        Labeled {
            label: "empty",
            value: Json(vec![]),
        },
    ];
    let (sink, _) = marshal_records(&records).expect("marshal");
    assert_eq!(sink.texts()[0], vec!["Label", "value"]);
    assert_eq!(sink.texts()[2], vec!["answer", "[4,2]"]);
    assert_eq!(sink.texts()[3], vec!["empty", "[]"]);
}

#[test]
fn unserializable_json_field_aborts_without_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("bad.xlsx");

    let mut dict_payload = BTreeMap::new();
    dict_payload.insert((0, 1), 2);
    let records = vec![
        Unserializable {
            key: 1,
            payload: Json(BTreeMap::new()),
        },
        Unserializable {
            key: 2,
            payload: Json(dict_payload),
        },
    ];

    let err = write_records(&path, &records).expect_err("tuple keys");
    match err {
        RowkitError::FieldEncode {
            field, record_idx, ..
        } => {
            assert_eq!(field, "payload");
            assert_eq!(record_idx, 1);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!path.exists());
}

#[test]
fn derived_records_write_a_workbook() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("customers.xlsx");

    let report = write_records(&path, &[customer(1, None)]).expect("write");
    assert_eq!(report.n_rows_total, 1 + 1 + 1 + 1 + 1);
    assert_eq!(report.n_cols, 6);
    assert!(std::fs::read(&path).expect("read").starts_with(b"PK"));
}

#[test]
fn wide_integer_ids_keep_every_digit() {
    let records = vec![
        LedgerEntry {
            id: 9_007_199_254_740_993,
            delta: -5,
        },
        LedgerEntry { id: 42, delta: 7 },
    ];
    let (sink, _) = marshal_records(&records).expect("marshal");

    assert_eq!(
        sink.rows[2].cells,
        vec![
            EnumCellValue::String("9007199254740993".to_string()),
            EnumCellValue::Number(-5.0),
        ]
    );
    assert_eq!(sink.texts()[3], vec!["42", "7"]);
}
