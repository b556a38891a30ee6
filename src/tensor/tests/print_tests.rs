use crate::tensor::Tensor;

#[test]
fn test_print_vector() {
    let tensor = Tensor::new(&[1., 2.], &[2]);
    let text = format!("{tensor}");
    assert!(text.contains("1.0000"));
    assert!(text.contains("形状: [2]"));
}

#[test]
fn test_print_long_row_is_elided() {
    let tensor = Tensor::new(&(0..10).map(|x| x as f32).collect::<Vec<_>>(), &[1, 10]);
    let text = format!("{tensor}");
    assert!(text.contains(".."));
    assert!(!text.contains("5.0000"));
    assert!(text.contains("9.0000"));
}

#[test]
fn test_print_high_rank() {
    let tensor = Tensor::zeros(&[2, 2, 2]);
    let text = format!("{tensor}");
    assert!(text.contains("rank>2"));
}
