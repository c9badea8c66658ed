use crate::distance::DistanceTable;
use crate::error::{CustomError, Result};
use std::io::Write;
use std::path::Path;

/// Written in place of a distance when two samples share no called positions.
pub const UNDEFINED_DISTANCE: &str = "NaN";

const HEADER: [&str; 3] = ["sample1", "sample2", "distance"];

pub fn format_distance(distance: Option<f64>) -> String {
    match distance {
        Some(d) => format!("{:.4}", d),
        None => UNDEFINED_DISTANCE.to_string(),
    }
}

pub fn write_distances(table: &DistanceTable, writer: impl Write) -> csv::Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(writer);
    wtr.write_record(HEADER)?;

    for (sample1, sample2, distance) in table.rows() {
        wtr.write_record([sample1, sample2, format_distance(distance).as_str()])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_distances_to_path(table: &DistanceTable, path: &Path) -> Result<()> {
    let f = std::fs::File::create(path).map_err(|e| CustomError::Write {
        source: e,
        path: path.to_path_buf(),
    })?;
    write_distances(table, std::io::BufWriter::new(f)).map_err(|e| CustomError::Write {
        source: e.into(),
        path: path.to_path_buf(),
    })
}

pub fn write_distances_to_stdout(table: &DistanceTable) -> Result<()> {
    let stdout = std::io::stdout();
    write_distances(table, stdout.lock())?;
    Ok(())
}
