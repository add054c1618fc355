use toontab::{
    read_table, write_table, Column, ColumnData, EncodeOptions, Encoder, Table, TableOptions,
};

fn sample_table() -> Table {
    Table::new(vec![
        Column::integer("id", vec![Some(1), Some(2)]),
        Column::string(
            "name",
            vec![Some("Ada".to_string()), Some("Ken, Jr.".to_string())],
        ),
        Column::double("score", vec![Some(99.5), None]),
    ])
}

#[test]
fn tabular_output_shape() {
    let out = Encoder::new(EncodeOptions::default())
        .encode_table(&sample_table())
        .unwrap();
    assert_eq!(
        out,
        "[2]{id,name,score}:\n  1, \"Ada\", 99.5\n  2, \"Ken, Jr.\", null\n"
    );
}

#[test]
fn logical_cells_render_as_literals() {
    let table = Table::new(vec![Column::logical(
        "flag",
        vec![Some(true), None, Some(false)],
    )]);
    let out = Encoder::new(EncodeOptions::default())
        .encode_table(&table)
        .unwrap();
    assert_eq!(out, "[3]{flag}:\n  true\n  null\n  false\n");
}

#[test]
fn write_then_read_round_trips_column_wise() {
    let table = sample_table();
    let f = tempfile::NamedTempFile::new().unwrap();
    write_table(f.path(), &table, &EncodeOptions::default()).unwrap();

    let (back, warnings) = read_table(f.path(), &TableOptions::default()).unwrap();
    assert!(warnings.is_empty());
    assert_eq!(back.n_rows, table.n_rows);
    for (a, b) in table.columns.iter().zip(back.columns.iter()) {
        assert_eq!(a.name, b.name);
        assert_eq!(a.col_type(), b.col_type());
        assert_eq!(a.na, b.na);
        match (&a.data, &b.data) {
            (ColumnData::Double(x), ColumnData::Double(y)) => {
                for (row, (xa, ya)) in x.iter().zip(y.iter()).enumerate() {
                    if !a.na[row] {
                        assert_eq!(xa, ya);
                    }
                }
            }
            (x, y) => assert_eq!(x, y),
        }
    }
}

#[test]
fn doubles_keep_fraction_marker_in_cells() {
    let table = Table::new(vec![Column::double("v", vec![Some(2.0)])]);
    let out = Encoder::new(EncodeOptions::default())
        .encode_table(&table)
        .unwrap();
    // `2` would read back as an integer column.
    assert_eq!(out, "[1]{v}:\n  2.0\n");
}
