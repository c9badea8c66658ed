use thiserror::Error;

#[derive(Debug, Error)]
pub enum CustomError {
    #[error("variant database does not exist: {path}")]
    DatabaseMissing { path: std::path::PathBuf },

    #[error("could not query variant database")]
    Database(#[from] rusqlite::Error),

    #[error("could not write to {path}")]
    Write {
        #[source]
        source: std::io::Error,
        path: std::path::PathBuf,
    },

    #[error("could not write report")]
    CsvWrite(#[from] csv::Error),

    #[error("could not shape genotype matrix")]
    MatrixShape(#[from] ndarray::ShapeError),

    #[error("could not build thread pool")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    // Schema errors: the samples table cannot be mapped onto genotype columns.
    #[error("sample \"{name}\" has no sample_id")]
    SchemaSampleIdMissing { name: String },

    #[error("sample_id {sample_id} appears more than once in the samples table")]
    SchemaSampleIdDuplicate { sample_id: i64 },

    #[error("sample_id {sample_id} is outside the expected range 1..={n_samples}")]
    SchemaSampleIdRange { sample_id: i64, n_samples: usize },

    #[error("sample name \"{name}\" appears more than once in the samples table")]
    SchemaSampleNameDuplicate { name: String },

    #[error("sample name {name:?} contains a tab or line break")]
    SchemaSampleNameInvalid { name: String },

    // Deserialization errors: a gt_types blob does not decode to one code per sample.
    #[error("could not decompress gt_types of variant {variant_id}")]
    GtTypesDecompress {
        #[source]
        source: std::io::Error,
        variant_id: i64,
    },

    #[error("gt_types of variant {variant_id} has {n_bytes} bytes, not a multiple of 4")]
    GtTypesByteLength { variant_id: i64, n_bytes: usize },

    #[error("gt_types of variant {variant_id} contains unrecognized genotype code {code}")]
    GtTypesCode { variant_id: i64, code: i32 },

    #[error("gt_types of variant {variant_id} has {got} codes (expected {expected}, one per sample)")]
    GtTypesLength {
        variant_id: i64,
        got: usize,
        expected: usize,
    },
}

pub type Result<T> = std::result::Result<T, CustomError>;
