use crate::Args;
use crate::distance::DistanceTable;
use crate::error::Result;
use crate::matrix::GenotypeMatrix;
use crate::output::{write_distances_to_path, write_distances_to_stdout};
use crate::reader::SiteReader;
use crate::reader::gemini::GeminiDbReader;
use rayon::ThreadPoolBuilder;
use std::path::{Path, PathBuf};
use tracing::info;

// Below this many samples the pair loop runs on the calling thread unless threads are requested.
const PARALLEL_THRESHOLD: usize = 64;

#[derive(Debug, Clone)]
pub struct RunSpec {
    db: PathBuf,
    output: Option<PathBuf>,
    threads: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parallelism {
    Sequential,
    GlobalPool,
    Pool(usize),
}

impl RunSpec {
    pub fn new(db: PathBuf, output: Option<PathBuf>, threads: Option<usize>) -> Self {
        Self {
            db,
            output,
            threads,
        }
    }

    pub fn log_paths(&self) {
        info!("DB    : {}", self.db.display());
        match &self.output {
            Some(path) => info!("OUTPUT: {}", path.display()),
            None => info!("OUTPUT: <stdout>"),
        }
    }

    pub fn open_reader(&self) -> Result<Box<dyn SiteReader>> {
        let reader = GeminiDbReader::open(&self.db)?;
        Ok(Box::new(reader))
    }

    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }

    pub fn threads(&self) -> Option<usize> {
        self.threads
    }
}

pub fn build_run_spec(args: &Args) -> RunSpec {
    RunSpec::new(
        args.db.clone(),
        args.output.clone(),
        args.threads.map(|n| n.get()),
    )
}

pub fn parallelism(n_samples: usize, threads: Option<usize>) -> Parallelism {
    match threads {
        Some(1) => Parallelism::Sequential,
        Some(n) => Parallelism::Pool(n),
        None if n_samples < PARALLEL_THRESHOLD => Parallelism::Sequential,
        None => Parallelism::GlobalPool,
    }
}

pub fn compute_distances(matrix: &GenotypeMatrix, threads: Option<usize>) -> Result<DistanceTable> {
    let table = match parallelism(matrix.n_samples(), threads) {
        Parallelism::Sequential => DistanceTable::compute(matrix),
        Parallelism::GlobalPool => DistanceTable::compute_parallel(matrix),
        Parallelism::Pool(n) => {
            let pool = ThreadPoolBuilder::new().num_threads(n).build()?;
            pool.install(|| DistanceTable::compute_parallel(matrix))
        }
    };
    Ok(table)
}

pub fn run(reader: &mut dyn SiteReader, output: Option<&Path>, threads: Option<usize>) -> Result<()> {
    let matrix = GenotypeMatrix::consume_reader(reader)?;

    info!(
        "Computing distances for {} sample pairs over {} SNPs...",
        matrix.n_samples() * matrix.n_samples(),
        matrix.n_variants()
    );
    let table = compute_distances(&matrix, threads)?;

    // Only write once every distance is known, so a failed run leaves no partial report
    match output {
        Some(path) => {
            info!("Writing pairwise distances to {}...", path.display());
            write_distances_to_path(&table, path)?;
        }
        None => write_distances_to_stdout(&table)?,
    }
    Ok(())
}
