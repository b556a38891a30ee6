use crate::{assert_err, assert_panic};
use crate::data::DataError;

fn failing(index: usize) -> Result<(), DataError> {
    Err(DataError::IndexOutOfBounds { index, len: 3 })
}

fn invalid() -> Result<(), DataError> {
    Err(DataError::InvalidConfig("batch_size 必须大于 0".to_string()))
}

#[test]
fn test_assert_err_variants() {
    assert_err!(failing(5));
    assert_err!(failing(5), DataError::IndexOutOfBounds { .. });
    assert_err!(failing(5), DataError::IndexOutOfBounds { index, .. } if *index == 5);
    assert_err!(invalid(), DataError::InvalidConfig("batch_size 必须大于 0"));
}

#[test]
fn test_assert_panic() {
    assert_panic!(panic!("出错了"), "出错了");
    assert_panic!(Vec::<u8>::new()[1]);
}

#[test]
#[should_panic]
fn test_assert_err_on_ok() {
    let ok: Result<u8, DataError> = Ok(1);
    assert_err!(ok, DataError::IndexOutOfBounds { .. });
}
