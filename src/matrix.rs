use crate::error::{CustomError, Result};
use crate::model::GenotypeCode;
use crate::reader::SiteReader;
use indicatif::{ProgressBar, ProgressStyle};
use ndarray::{Array2, ArrayView1};
use tracing::info;

/// Genotype codes and their known/unknown mask.
/// Row `s` is sample `s` in store column order; column `v` is the `v`-th SNP read.
pub struct GenotypeMatrix {
    samples: Vec<String>,
    genotypes: Array2<i8>,
    known: Array2<bool>,
}

impl GenotypeMatrix {
    pub fn new(samples: Vec<String>, genotypes: Array2<i8>, known: Array2<bool>) -> Self {
        assert_eq!(
            genotypes.dim(),
            known.dim(),
            "genotype matrix and mask shapes differ"
        );
        assert_eq!(
            genotypes.nrows(),
            samples.len(),
            "genotype matrix rows and sample count differ"
        );
        Self {
            samples,
            genotypes,
            known,
        }
    }

    /// Derives the mask from the codes: known iff the code is not the unknown code.
    pub fn from_codes(samples: Vec<String>, genotypes: Array2<i8>) -> Self {
        let known = genotypes.mapv(|code| code != GenotypeCode::UNKNOWN_CODE);
        Self::new(samples, genotypes, known)
    }

    pub fn consume_reader(reader: &mut dyn SiteReader) -> Result<Self> {
        let samples: Vec<String> = reader.samples().to_vec();
        let n_samples = samples.len();

        let pb = ProgressBar::new(reader.n_sites() as u64);
        pb.set_style(
            ProgressStyle::with_template("[{elapsed_precise}] {bar:30} {pos}/{len} sites").unwrap(),
        );

        // Site-major while reading; reversing the axes views the same buffer sample-major
        let mut codes: Vec<i8> = Vec::with_capacity(reader.n_sites() * n_samples);
        let mut n_variants = 0usize;
        for site in reader {
            let site = site?;
            if site.genotypes.len() != n_samples {
                return Err(CustomError::GtTypesLength {
                    variant_id: site.variant_id,
                    got: site.genotypes.len(),
                    expected: n_samples,
                });
            }
            codes.extend(site.genotypes.iter().map(|g| g.code()));
            n_variants += 1;
            pb.inc(1);
        }
        pb.abandon();

        let genotypes = Array2::from_shape_vec((n_variants, n_samples), codes)?.reversed_axes();
        info!("Loaded {} SNPs x {} samples", n_variants, n_samples);
        Ok(Self::from_codes(samples, genotypes))
    }

    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    pub fn n_samples(&self) -> usize {
        self.samples.len()
    }

    pub fn n_variants(&self) -> usize {
        self.genotypes.ncols()
    }

    pub fn genotypes(&self, sample_idx: usize) -> ArrayView1<'_, i8> {
        self.genotypes.row(sample_idx)
    }

    pub fn known(&self, sample_idx: usize) -> ArrayView1<'_, bool> {
        self.known.row(sample_idx)
    }
}
