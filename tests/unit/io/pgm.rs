//! Tests for ASCII graymap tokenizing, parsing and writing

#[cfg(test)]
mod tests {
    use leaforder::AlgorithmError;
    use leaforder::dataset::{Raster, RowVector};
    use leaforder::io::error::InputError;
    use leaforder::io::pgm::{Tokens, format_pgm, parse_pgm, read_pgm, write_pgm};
    use tempfile::TempDir;

    fn input_error(text: &str) -> InputError {
        match parse_pgm(text) {
            Err(AlgorithmError::InvalidInput(error)) => error,
            other => unreachable!("expected an input error, got {other:?}"),
        }
    }

    // Tests comments are stripped wherever a token may start
    // Verified by only skipping comments at line starts
    #[test]
    fn test_tokens_skip_comments() {
        let tokens: Vec<&str> = Tokens::new("P2 # made by hand\n#full line\n 3\t2 #x\n").collect();
        assert_eq!(tokens, vec!["P2", "3", "2"]);
        assert_eq!(Tokens::new("#only a comment").count(), 0);
    }

    // Tests a well-formed file with comments and free layout
    // Verified by reading samples column-major
    #[test]
    fn test_parse_valid() {
        let raster = parse_pgm("P2\n# comment\n3 2\n255\n0 1 2\n3 4\n5\n").expect("valid graymap");

        assert_eq!(raster.width(), 3);
        assert_eq!(raster.height(), 2);
        assert_eq!(raster.max_gray(), 255);
        assert_eq!(raster.rows().first(), Some(&RowVector::new(vec![0, 1, 2])));
        assert_eq!(raster.rows().get(1), Some(&RowVector::new(vec![3, 4, 5])));
    }

    // Tests the magic marker is matched without regard to case
    // Verified by comparing the magic exactly
    #[test]
    fn test_magic_case_insensitive() {
        assert!(parse_pgm("p2 1 1 1 1").is_ok());
        assert_eq!(
            input_error("P5 1 1 1 1"),
            InputError::BadMagic {
                found: "P5".to_string(),
            }
        );
    }

    // Tests header failures map to distinct errors
    // Verified by accepting a zero height
    #[test]
    fn test_header_errors() {
        assert!(matches!(
            input_error("P2 x 1 1"),
            InputError::InvalidHeaderField { field: "width", .. }
        ));
        assert!(matches!(
            input_error("P2 1 0 1"),
            InputError::InvalidDimension {
                field: "height",
                value: 0,
            }
        ));
        assert_eq!(
            input_error("P2 1 1 0"),
            InputError::MaxGrayOutOfRange { value: 0 }
        );
        assert_eq!(
            input_error("P2 1 1 65537"),
            InputError::MaxGrayOutOfRange { value: 65_537 }
        );
        assert_eq!(
            input_error("P2 1 1"),
            InputError::UnexpectedEof {
                expected: "maximum gray value",
            }
        );
        assert_eq!(
            input_error(""),
            InputError::UnexpectedEof { expected: "magic" }
        );
    }

    // Tests sample failures report their position
    // Verified by skipping the maximum gray comparison
    #[test]
    fn test_sample_errors() {
        assert_eq!(
            input_error("P2 2 2 9 1 2 3 10"),
            InputError::SampleOutOfRange {
                row: 1,
                col: 1,
                value: 10,
                max_gray: 9,
            }
        );
        assert!(matches!(
            input_error("P2 2 1 9 1 -2"),
            InputError::InvalidSample { row: 0, col: 1, .. }
        ));
        assert_eq!(
            input_error("P2 2 2 9 1 2 3"),
            InputError::UnexpectedEof {
                expected: "samples",
            }
        );
    }

    // Tests the full 16-bit range plus one is accepted
    // Verified by storing samples as u16
    #[test]
    fn test_largest_max_gray() {
        let raster = parse_pgm("P2 2 1 65536 0 65536").expect("max gray is in range");
        assert_eq!(raster.samples().collect::<Vec<_>>(), vec![0, 65_536]);
    }

    // Tests output layout: header lines then one row per line
    // Verified by writing all samples on one line
    #[test]
    fn test_format_layout() {
        let rows = vec![RowVector::new(vec![1, 2]), RowVector::new(vec![3, 4])];
        let raster = Raster::new(2, 7, rows).expect("valid raster");

        assert_eq!(format_pgm(&raster), "P2\n2 2\n7\n1 2\n3 4\n");
    }

    // Tests writing to disk and reading back yields the same raster
    // Verified by dropping the last row on write
    #[test]
    fn test_write_then_read() {
        let temp_dir = TempDir::new().expect("Failed to create temporary directory");
        let path = temp_dir.path().join("nested").join("out.pgm");
        let raster = parse_pgm("P2 3 2 100 100 0 50 25 75 0").expect("valid graymap");

        write_pgm(&path, &raster).expect("Failed to write graymap");
        assert_eq!(read_pgm(&path).expect("Failed to read graymap"), raster);
    }

    // Tests a missing file reports the path
    // Verified by discarding the path in the error
    #[test]
    fn test_read_missing_file() {
        let temp_dir = TempDir::new().expect("Failed to create temporary directory");
        let path = temp_dir.path().join("absent.pgm");

        match read_pgm(&path) {
            Err(AlgorithmError::FileSystem { path: reported, .. }) => assert_eq!(reported, path),
            other => unreachable!("expected a file system error, got {other:?}"),
        }
    }
}
