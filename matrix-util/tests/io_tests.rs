use matrix_util::common_io::{
    create_temp_dir_file, read_lines, read_lines_of_words_delim, write_lines,
};
use matrix_util::membership::Membership;
use matrix_util::traits::{IoOps, SampleOps};

#[test]
fn dmatrix_io_test() -> anyhow::Result<()> {
    let xx = nalgebra::DMatrix::<f64>::runif(50, 20);

    let tsv_file = create_temp_dir_file("txt.gz")?;
    xx.to_tsv(tsv_file.to_str().unwrap())?;

    let yy = nalgebra::DMatrix::<f64>::read_file_delim(tsv_file.to_str().unwrap(), "\t", None)?;

    approx::assert_abs_diff_eq!(xx, yy, epsilon = 1e-12);

    Ok(())
}

#[test]
fn dmatrix_names_io_test() -> anyhow::Result<()> {
    let xx = nalgebra::DMatrix::<f64>::rnorm(4, 3);
    let rows: Vec<Box<str>> = (0..4).map(|i| format!("s{}", i).into()).collect();
    let cols: Vec<Box<str>> = ["g1", "g2", "g3"].into_iter().map(Box::from).collect();

    let file = create_temp_dir_file("tsv")?;
    let file = file.to_str().unwrap();
    xx.write_names_delim(file, "\t", &rows, &cols)?;

    let yy = nalgebra::DMatrix::<f64>::read_names_delim(file, "\t")?;
    assert_eq!(yy.rows, rows);
    assert_eq!(yy.cols, cols);
    approx::assert_abs_diff_eq!(xx, yy.mat, epsilon = 1e-12);

    Ok(())
}

#[test]
fn header_with_corner_field() -> anyhow::Result<()> {
    let file = create_temp_dir_file("csv")?;
    let file = file.to_str().unwrap();
    let lines: Vec<Box<str>> = vec!["node,a,b".into(), "a,1,NA".into(), "b,0.5,1".into()];
    write_lines(&lines, file)?;

    let yy = nalgebra::DMatrix::<f64>::read_names_delim(file, ",")?;
    assert_eq!(yy.cols, vec![Box::from("a"), Box::from("b")]);
    assert!(yy.mat[(0, 1)].is_nan());
    assert_eq!(yy.mat[(1, 0)], 0.5);
    Ok(())
}

#[test]
fn membership_file_test() -> anyhow::Result<()> {
    let file = create_temp_dir_file("txt.gz")?;
    let file = file.to_str().unwrap();
    let lines: Vec<Box<str>> = vec![
        "# node module".into(),
        "n1\tblue".into(),
        "n2\tred".into(),
        "n3 blue".into(),
        "broken".into(),
    ];
    write_lines(&lines, file)?;

    let mm = Membership::from_file(file, 0, 1)?;
    assert_eq!(mm.len(), 3);
    assert_eq!(mm.get("n3"), Some("blue"));
    assert_eq!(mm.groups().len(), 2);
    Ok(())
}

#[test]
fn invalid_utf8_line_is_an_error() -> anyhow::Result<()> {
    let file = create_temp_dir_file("tsv")?;
    let file = file.to_str().unwrap();

    let mut bytes = b"name\ta\tb\ns1\t1\t2\ns2\t3\t4\n".to_vec();
    bytes.extend_from_slice(b"s3\t\xff\t5\ns4\t6\t7\n");
    std::fs::write(file, &bytes)?;

    assert!(read_lines_of_words_delim(file, "\t", 0).is_err());
    assert!(read_lines(file).is_err());
    assert!(nalgebra::DMatrix::<f64>::read_names_delim(file, "\t").is_err());
    Ok(())
}

#[test]
fn truncated_gz_is_an_error() -> anyhow::Result<()> {
    let full = create_temp_dir_file("tsv.gz")?;
    let full = full.to_str().unwrap();
    let xx = nalgebra::DMatrix::<f64>::rnorm(5000, 3);
    xx.to_tsv(full)?;

    let complete = read_lines_of_words_delim(full, "\t", -1)?;
    assert_eq!(complete.lines.len(), 5000);

    let bytes = std::fs::read(full)?;
    let cut = create_temp_dir_file("tsv.gz")?;
    let cut = cut.to_str().unwrap();
    std::fs::write(cut, &bytes[..(bytes.len() / 2)])?;

    assert!(read_lines_of_words_delim(cut, "\t", -1).is_err());
    assert!(read_lines(cut).is_err());
    Ok(())
}
