use flate2::read::ZlibDecoder;
use std::io::Read;

use crate::error::{CustomError, Result};
use crate::model::GenotypeCode;

const CODE_BYTES: usize = 4;

// A gt_types blob is a zlib stream of little-endian i32 codes, one per sample.
pub fn decode_gt_types(variant_id: i64, blob: &[u8], n_samples: usize) -> Result<Vec<GenotypeCode>> {
    let mut raw = Vec::with_capacity(n_samples * CODE_BYTES);
    ZlibDecoder::new(blob)
        .read_to_end(&mut raw)
        .map_err(|e| CustomError::GtTypesDecompress {
            source: e,
            variant_id,
        })?;

    if raw.len() % CODE_BYTES != 0 {
        return Err(CustomError::GtTypesByteLength {
            variant_id,
            n_bytes: raw.len(),
        });
    }
    let n_codes = raw.len() / CODE_BYTES;
    if n_codes != n_samples {
        return Err(CustomError::GtTypesLength {
            variant_id,
            got: n_codes,
            expected: n_samples,
        });
    }

    raw.chunks_exact(CODE_BYTES)
        .map(|chunk| {
            let code = i32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
            GenotypeCode::from_code(code).ok_or(CustomError::GtTypesCode { variant_id, code })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::ZlibEncoder;
    use std::io::Write;

    fn compress(codes: &[i32]) -> Vec<u8> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        for code in codes {
            encoder.write_all(&code.to_le_bytes()).unwrap();
        }
        encoder.finish().unwrap()
    }

    #[test]
    fn decodes_all_genotype_classes() {
        let blob = compress(&[0, 1, -1, 2]);
        let codes = decode_gt_types(7, &blob, 4).expect("valid blob should decode");
        assert_eq!(
            codes,
            vec![
                GenotypeCode::HomRef,
                GenotypeCode::Het,
                GenotypeCode::Unknown,
                GenotypeCode::HomAlt
            ]
        );
    }

    #[test]
    fn errors_on_wrong_sample_count() {
        let blob = compress(&[0, 1, 2]);
        let err = decode_gt_types(7, &blob, 4).unwrap_err();
        match err {
            CustomError::GtTypesLength {
                variant_id,
                got,
                expected,
            } => {
                assert_eq!(variant_id, 7);
                assert_eq!(got, 3);
                assert_eq!(expected, 4);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn errors_on_unrecognized_code() {
        let blob = compress(&[0, 3]);
        let err = decode_gt_types(9, &blob, 2).unwrap_err();
        assert!(matches!(
            err,
            CustomError::GtTypesCode {
                variant_id: 9,
                code: 3
            }
        ));
    }

    #[test]
    fn errors_on_uncompressed_blob() {
        let err = decode_gt_types(1, b"not a zlib stream", 1).unwrap_err();
        assert!(matches!(
            err,
            CustomError::GtTypesDecompress { variant_id: 1, .. }
        ));
    }

    #[test]
    fn errors_on_truncated_code() {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&[0, 0, 0, 0, 1, 0]).unwrap();
        let blob = encoder.finish().unwrap();
        let err = decode_gt_types(2, &blob, 2).unwrap_err();
        assert!(matches!(
            err,
            CustomError::GtTypesByteLength {
                variant_id: 2,
                n_bytes: 6
            }
        ));
    }

    #[test]
    fn zero_samples_decode_to_empty() {
        let blob = compress(&[]);
        let codes = decode_gt_types(3, &blob, 0).expect("empty blob should decode");
        assert!(codes.is_empty());
    }
}
