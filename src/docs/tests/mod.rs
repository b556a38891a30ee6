use crate::assert_err;
use crate::data::DataSetKind;
use crate::docs::{
    DocError, IndexPage, number_word, parse_index_page, parse_number, render_index_page,
};

/// 基准工具原有的数据集索引页：声明九个数据集，目录只列出七个
const SUPPLIED_PAGE: &str = "\
==========
Data Sets
==========

Currently DeepOBS includes nine different data sets. Each data set inherits from
the same base class with the following signature.

.. autoclass:: deepobs.pytorch.datasets.dataset.DataSet
    :members:

.. toctree::
  :maxdepth: 2
  :caption: Data Sets

  datasets/quadratic
  datasets/mnist
  datasets/fmnist
  datasets/cifar10
  datasets/cifar100
  datasets/svhn
  datasets/tolstoi
";

#[test]
fn test_parse_supplied_page() {
    let page = parse_index_page(SUPPLIED_PAGE).unwrap();
    assert_eq!(page.title, "Data Sets");
    assert_eq!(
        page.base_class.as_deref(),
        Some("deepobs.pytorch.datasets.dataset.DataSet")
    );
    assert_eq!(page.stated_count, Some(9));
    assert_eq!(page.entries.len(), 7);
    assert_eq!(page.entries[0], "datasets/quadratic");
    assert_eq!(
        page.entry_names(),
        vec!["quadratic", "mnist", "fmnist", "cifar10", "cifar100", "svhn", "tolstoi"]
    );
}

#[test]
fn test_supplied_page_is_inconsistent() {
    let page = parse_index_page(SUPPLIED_PAGE).unwrap();
    assert_err!(
        page.check_consistency(),
        DocError::CountMismatch { stated: 9, listed: 7 }
    );
    // 所有列出的条目都是已注册的数据集，缺的是 two_d 与 imagenet
    assert!(page.check_against_registry().is_ok());
    assert_eq!(page.missing_from_registry(), vec!["two_d", "imagenet"]);
}

#[test]
fn test_rendered_page_passes() {
    let text = render_index_page(&DataSetKind::ALL);
    assert!(text.contains("includes nine different data sets"));

    let page = parse_index_page(&text).unwrap();
    assert_eq!(page.title, "Data Sets");
    assert_eq!(page.entries.len(), 9);
    assert!(page.check_consistency().is_ok());
    assert!(page.check_against_registry().is_ok());
    assert!(page.missing_from_registry().is_empty());
}

#[test]
fn test_windows_line_endings_and_digits() {
    let text = "Sets\r\n----\r\n\r\nThis suite includes 2 different data sets.   \r\n\r\n\
                .. toctree::\r\n   :maxdepth: 1\r\n\r\n   mnist   \r\n   svhn\r\n\r\nTrailing text\r\n   ignored\r\n";
    let page = parse_index_page(text).unwrap();
    assert_eq!(page.title, "Sets");
    assert_eq!(page.base_class, None);
    assert_eq!(page.stated_count, Some(2));
    assert_eq!(page.entries, vec!["mnist", "svhn"]);
    assert!(page.check_consistency().is_ok());
}

#[test]
fn test_page_errors() {
    assert_err!(
        parse_index_page("Title\n=====\n\nincludes two different data sets\n"),
        DocError::MissingToctree
    );

    let page = parse_index_page(".. toctree::\n\n   mnist\n").unwrap();
    assert_err!(page.check_consistency(), DocError::MissingCount);

    let page = IndexPage {
        title: String::new(),
        base_class: None,
        stated_count: Some(1),
        entries: vec!["datasets/imagenet21k".to_string()],
    };
    assert_err!(
        page.check_against_registry(),
        DocError::UnknownEntry(name) if name == "imagenet21k"
    );
}

#[test]
fn test_number_words() {
    assert_eq!(number_word(9), "nine");
    assert_eq!(number_word(20), "twenty");
    assert_eq!(number_word(21), "21");
    assert_eq!(parse_number("Nine"), Some(9));
    assert_eq!(parse_number("12"), Some(12));
    assert_eq!(parse_number("many"), None);
}
