use rusqlite::{Connection, OpenFlags, Row, params};
use std::path::Path;
use tracing::{debug, warn};

use crate::error::{CustomError, Result};
use crate::model::Site;
use crate::reader::SiteReader;
use crate::reader::codec::decode_gt_types;
use crate::reader::samples::{SampleIndex, SampleRow};

/// SNP rows fetched per query.
pub const DEFAULT_BATCH_SIZE: usize = 4096;

const SAMPLES_QUERY: &str = "SELECT sample_id, name FROM samples";
const SNP_COUNT_QUERY: &str = "SELECT COUNT(*) FROM \
                               (SELECT DISTINCT v.variant_id, v.gt_types \
                                FROM variants v \
                                WHERE v.type = 'snp')";
const FIRST_SNPS_QUERY: &str = "SELECT DISTINCT v.variant_id, v.gt_types \
                                FROM variants v \
                                WHERE v.type = 'snp' \
                                ORDER BY v.variant_id, v.gt_types \
                                LIMIT ?1";
// Resumes strictly after the last row handed out
const NEXT_SNPS_QUERY: &str = "SELECT DISTINCT v.variant_id, v.gt_types \
                               FROM variants v \
                               WHERE v.type = 'snp' \
                               AND (v.variant_id, v.gt_types) > (?1, ?2) \
                               ORDER BY v.variant_id, v.gt_types \
                               LIMIT ?3";

/// Reads SNP genotypes from a variant database.
///
/// The connection is read-only and is closed when the reader is dropped.
/// SNP rows are fetched in batches ordered by `variant_id`, so at most one batch
/// of compressed blobs is held in memory; each blob is decoded as its site is yielded.
pub struct GeminiDbReader {
    connection: Connection,
    samples: SampleIndex,
    batch: std::vec::IntoIter<SnpRow>,
    batch_size: usize,
    cursor: Option<SnpRow>,
    n_sites: usize,
    exhausted: bool,
}

struct SnpRow {
    variant_id: i64,
    gt_types: Vec<u8>,
}

impl SnpRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            variant_id: row.get(0)?,
            gt_types: row.get(1)?,
        })
    }
}

impl SampleRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            sample_id: row.get(0)?,
            name: row.get(1)?,
        })
    }
}

impl GeminiDbReader {
    pub fn open(db_path: &impl AsRef<Path>) -> Result<Self> {
        Self::open_with_batch_size(db_path, DEFAULT_BATCH_SIZE)
    }

    pub fn open_with_batch_size(db_path: &impl AsRef<Path>, batch_size: usize) -> Result<Self> {
        let db_path = db_path.as_ref();
        if !db_path.exists() {
            return Err(CustomError::DatabaseMissing {
                path: db_path.to_path_buf(),
            });
        }

        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let connection = Connection::open_with_flags(db_path, flags)?;

        let samples = read_samples(&connection)?;
        if samples.is_empty() {
            warn!("No samples found in {}", db_path.display());
        }
        let n_sites = count_snps(&connection)?;
        debug!(
            "Found {} samples and {} SNP records in {}",
            samples.len(),
            n_sites,
            db_path.display()
        );

        Ok(Self {
            connection,
            samples,
            batch: Vec::new().into_iter(),
            batch_size: batch_size.max(1),
            cursor: None,
            n_sites,
            exhausted: false,
        })
    }

    fn fetch_batch(&self) -> Result<Vec<SnpRow>> {
        let limit = self.batch_size as i64;
        let rows = match &self.cursor {
            None => {
                let mut get_snps = self.connection.prepare(FIRST_SNPS_QUERY)?;
                get_snps
                    .query_map(params![limit], SnpRow::from_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?
            }
            Some(last) => {
                let mut get_snps = self.connection.prepare(NEXT_SNPS_QUERY)?;
                get_snps
                    .query_map(
                        params![last.variant_id, last.gt_types, limit],
                        SnpRow::from_row,
                    )?
                    .collect::<rusqlite::Result<Vec<_>>>()?
            }
        };
        Ok(rows)
    }

    fn next_row(&mut self) -> Result<Option<SnpRow>> {
        if let Some(row) = self.batch.next() {
            return Ok(Some(row));
        }
        if self.exhausted {
            return Ok(None);
        }
        let rows = self.fetch_batch()?;
        self.exhausted = rows.len() < self.batch_size;
        self.batch = rows.into_iter();
        Ok(self.batch.next())
    }

    fn poison(&mut self) {
        self.batch = Vec::new().into_iter();
        self.exhausted = true;
    }
}

fn read_samples(connection: &Connection) -> Result<SampleIndex> {
    let mut get_samples = connection.prepare(SAMPLES_QUERY)?;
    let rows = get_samples
        .query_map((), SampleRow::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    SampleIndex::from_rows(rows)
}

fn count_snps(connection: &Connection) -> Result<usize> {
    let mut count_rows = connection.prepare(SNP_COUNT_QUERY)?;
    let n_sites: i64 = count_rows.query_row((), |row| row.get(0))?;
    Ok(n_sites as usize)
}

impl SiteReader for GeminiDbReader {
    fn samples(&self) -> &[String] {
        self.samples.names()
    }

    fn n_sites(&self) -> usize {
        self.n_sites
    }
}

impl Iterator for GeminiDbReader {
    type Item = Result<Site>;

    fn next(&mut self) -> Option<Self::Item> {
        let row = match self.next_row() {
            Ok(row) => row?,
            Err(e) => {
                self.poison();
                return Some(Err(e));
            }
        };
        match decode_gt_types(row.variant_id, &row.gt_types, self.samples.len()) {
            Ok(genotypes) => {
                let variant_id = row.variant_id;
                self.cursor = Some(row);
                Some(Ok(Site {
                    variant_id,
                    genotypes,
                }))
            }
            Err(e) => {
                // Poison iterator to prevent further reads
                self.poison();
                Some(Err(e))
            }
        }
    }
}
