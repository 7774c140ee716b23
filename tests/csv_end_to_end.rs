use std::collections::HashMap;

use column_inference::inference::infer_table;
use column_inference::types::{Cell, DataType, RawTable, Value};

const PEOPLE: &str = "\
id,name,active,score,joined,wait,band
1,Alice,yes,98.5,2021-03-04,1 days,A
2,Bob,no,87,2019-11-20,2 days,B
3,Carol,N/A,,2020-01-01,12:30:00,A
4,Dan,yes,91.25,2022-07-15,1h30min,A
";

fn read_csv(text: &str) -> RawTable {
    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let headers: Vec<String> = reader.headers().unwrap().iter().map(str::to_string).collect();
    let rows: Vec<Vec<Cell>> = reader
        .records()
        .map(|record| {
            record
                .unwrap()
                .iter()
                .map(|field| if field.is_empty() { Cell::Absent } else { Cell::from(field) })
                .collect()
        })
        .collect();
    RawTable::from_rows(headers, rows).unwrap()
}

#[test]
fn infers_types_from_csv_text() {
    let table = read_csv(PEOPLE);
    assert_eq!(table.row_count(), 4);

    let typed = infer_table(&table, &HashMap::new()).unwrap();
    assert_eq!(
        typed.dtypes(),
        vec![
            ("id", DataType::Int8),
            ("name", DataType::Object),
            ("active", DataType::Bool),
            ("score", DataType::Float32),
            ("joined", DataType::Datetime),
            ("wait", DataType::Timedelta),
            ("band", DataType::Category),
        ]
    );

    let active = typed.column("active").unwrap();
    assert_eq!(active.values[2], Value::Null);
    assert_eq!(typed.column("score").unwrap().null_count(), 1);
    assert_eq!(typed.column("band").unwrap().categories(), vec!["A", "B"]);
}

#[test]
fn stored_types_rematerialize_the_same_table() {
    let table = read_csv(PEOPLE);
    let first = infer_table(&table, &HashMap::new()).unwrap();

    let stored: HashMap<String, String> = first
        .dtypes()
        .into_iter()
        .map(|(name, dtype)| (name.to_string(), dtype.to_string()))
        .collect();
    let again = infer_table(&table, &stored).unwrap();
    assert_eq!(again, first);
}

#[test]
fn user_override_widens_a_column() {
    let table = read_csv(PEOPLE);
    let explicit = HashMap::from([
        ("id".to_string(), "int64".to_string()),
        ("score".to_string(), "float64".to_string()),
    ]);
    let typed = infer_table(&table, &explicit).unwrap();
    assert_eq!(typed.dtype("id"), Some(DataType::Int64));
    assert_eq!(typed.column("score").unwrap().values[0], Value::Float64(98.5));
    assert_eq!(typed.dtype("name"), Some(DataType::Object));
}
