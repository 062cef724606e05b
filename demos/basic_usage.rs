use rustseries::{Row, Selection, Series, SeriesResult, SortOrder, Value, ValueKind};

fn main() -> SeriesResult<()> {
    let prices = vec![
        Row::positional(["1997-01-01", "goog", "32.00"]),
        Row::positional(["1997-01-02", "goog", "33.00"]),
        Row::positional(["1997-01-03", "goog", "34.00"]),
    ];

    let mut series = Series::new(["dates", "symbols", "closes"])?;
    series.load_rows(&prices, &Selection::new())?;
    series.format_column("closes", ValueKind::Double, None)?;
    series.format_column("dates", ValueKind::Timestamp, Some("%Y-%m-%d"))?;

    series.append_column("opens", vec![31.0.into(), 33.0.into(), 35.0.into()])?;
    series.initialize_column("sma_closes", Value::Null);
    series.append_row(
        Row::keyed([("dates", Value::from(chrono_day(4))), ("closes", 38.0.into())]),
        &Selection::names(["dates", "closes"]),
    )?;

    println!("Loaded series:\n{}", series);

    series.sort_by(&["closes"], SortOrder::Descending)?;
    println!("\nSorted by closes, descending:\n{}", series);
    println!("\nFirst row: {:?}", series.row(0)?);
    Ok(())
}

fn chrono_day(day: u32) -> Option<chrono::NaiveDate> {
    chrono::NaiveDate::from_ymd_opt(1997, 1, day)
}
