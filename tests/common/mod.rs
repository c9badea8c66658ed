use flate2::Compression;
use flate2::write::ZlibEncoder;
use rusqlite::{Connection, params};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const UNKNOWN: i32 = -1;
pub const HOM_REF: i32 = 0;
pub const HET: i32 = 1;
pub const HOM_ALT: i32 = 2;

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

pub struct Dataset {
    pub db: PathBuf,
    pub output: PathBuf,
}

pub struct Variant {
    pub variant_id: i64,
    pub kind: &'static str,
    pub gt_types: Vec<u8>,
}

impl Variant {
    pub fn snp(variant_id: i64, codes: &[i32]) -> Self {
        Self {
            variant_id,
            kind: "snp",
            gt_types: compress(codes),
        }
    }

    pub fn indel(variant_id: i64, codes: &[i32]) -> Self {
        Self {
            variant_id,
            kind: "indel",
            gt_types: compress(codes),
        }
    }

    pub fn raw_snp(variant_id: i64, gt_types: &[u8]) -> Self {
        Self {
            variant_id,
            kind: "snp",
            gt_types: gt_types.to_vec(),
        }
    }
}

pub fn compress(codes: &[i32]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    for code in codes {
        encoder
            .write_all(&code.to_le_bytes())
            .expect("writing to a Vec cannot fail");
    }
    encoder.finish().expect("finishing a Vec encoder cannot fail")
}

pub fn create_dataset(
    label: &str,
    samples: &[(i64, &str)],
    variants: &[Variant],
) -> io::Result<Dataset> {
    let samples: Vec<(Option<i64>, &str)> = samples
        .iter()
        .map(|&(sample_id, name)| (Some(sample_id), name))
        .collect();
    create_dataset_with_sample_ids(label, &samples, variants)
}

/// Like [`create_dataset`], but a `None` id is stored as NULL.
pub fn create_dataset_with_sample_ids(
    label: &str,
    samples: &[(Option<i64>, &str)],
    variants: &[Variant],
) -> io::Result<Dataset> {
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    let base_dir = std::env::temp_dir().join("gtdist-tests").join(format!(
        "{}-{}-{}",
        std::process::id(),
        id,
        label
    ));
    if base_dir.exists() {
        fs::remove_dir_all(&base_dir)?;
    }
    fs::create_dir_all(&base_dir)?;

    let db = base_dir.join("variants.db");
    let output = base_dir.join("distances.tsv");
    write_db(&db, samples, variants).map_err(io::Error::other)?;
    Ok(Dataset { db, output })
}

fn write_db(
    path: &PathBuf,
    samples: &[(Option<i64>, &str)],
    variants: &[Variant],
) -> rusqlite::Result<()> {
    let connection = Connection::open(path)?;
    connection.execute_batch(
        "CREATE TABLE samples (
             sample_id INTEGER,
             name TEXT,
             family_id TEXT,
             sex INTEGER,
             phenotype INTEGER
         );
         CREATE TABLE variants (
             variant_id INTEGER,
             chrom TEXT,
             start INTEGER,
             ref TEXT,
             alt TEXT,
             type TEXT,
             sub_type TEXT,
             is_coding INTEGER,
             aaf REAL,
             gt_types BLOB
         );",
    )?;
    for (sample_id, name) in samples {
        connection.execute(
            "INSERT INTO samples (sample_id, name, family_id, sex, phenotype) \
             VALUES (?1, ?2, '0', 0, 0)",
            params![sample_id, name],
        )?;
    }
    for variant in variants {
        connection.execute(
            "INSERT INTO variants (variant_id, chrom, start, type, gt_types) \
             VALUES (?1, 'chr1', ?2, ?3, ?4)",
            params![
                variant.variant_id,
                variant.variant_id * 100,
                variant.kind,
                variant.gt_types
            ],
        )?;
    }
    Ok(())
}
