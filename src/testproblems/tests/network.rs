use approx::assert_abs_diff_eq;

use crate::assert_err;
use crate::tensor::Tensor;
use crate::testproblems::{Init, Network, TestProblemError, l2_regularization, net_vgg};

#[test]
fn test_vgg16_structure() {
    let net = net_vgg(10, 16).unwrap();
    assert_eq!(net.name(), "vgg16");
    // 13 个卷积层 + 3 个全连接层，各有权重与偏置
    assert_eq!(net.num_tensors(), 32);
    assert_eq!(net.num_parameters(), 134_301_514);

    let shapes = net.named_shapes();
    assert_eq!(shapes[0], ("conv1_1.weight", &[64, 3, 3, 3][..]));
    assert_eq!(shapes[1], ("conv1_1.bias", &[64][..]));
    assert_eq!(shapes[4].0, "conv2_1.weight");
    assert_eq!(shapes[26], ("fc1.weight", &[4096, 512 * 7 * 7][..]));
    assert_eq!(shapes[31], ("fc3.bias", &[10][..]));
    assert!(!net.is_initialized());
}

#[test]
fn test_vgg19_and_invalid_variant() {
    let net = net_vgg(100, 19).unwrap();
    assert_eq!(net.num_tensors(), 38);
    assert!(net.named_shapes().iter().any(|(name, _)| *name == "conv5_4.weight"));

    assert_err!(net_vgg(10, 11), TestProblemError::InvalidConfig(_));
    assert_err!(net_vgg(0, 16), TestProblemError::InvalidConfig(_));
}

fn small_net() -> Network {
    let mut net = Network::new("small");
    net.add_conv2d("conv", 2, 4, 3).add_linear("fc", 8, 3);
    net
}

#[test]
fn test_initialize() {
    let mut net = small_net();
    assert_err!(
        net.named_parameters(),
        TestProblemError::NotInitialized("conv.weight")
    );

    net.initialize(42);
    assert!(net.is_initialized());
    let params = net.named_parameters().unwrap();
    assert_eq!(params.len(), 4);
    // 偏置为零
    assert_eq!(net.parameter("conv.bias").unwrap().square_sum(), 0.0);
    assert_eq!(net.parameter("fc.weight").unwrap().shape(), &[3, 8]);

    // 同一种子结果相同
    let mut again = small_net();
    again.initialize(42);
    assert_eq!(net.parameter("fc.weight"), again.parameter("fc.weight"));
}

#[test]
fn test_xavier_scale() {
    let mut rng = rand::SeedableRng::seed_from_u64(0);
    // fan_in = 64 * 9, fan_out = 128 * 9
    let weight = Init::XavierNormal.generate_with_rng(&[128, 64, 3, 3], &mut rng);
    let std = (weight.square_sum() / weight.size() as f32).sqrt();
    let expected = (2.0f32 / (9.0 * (64.0 + 128.0))).sqrt();
    assert_abs_diff_eq!(std, expected, epsilon = expected * 0.05);
    assert_eq!(
        Init::Constant(0.5).generate_with_rng(&[2], &mut rng).to_vec(),
        vec![0.5, 0.5]
    );
}

#[test]
fn test_set_parameter() {
    let mut net = small_net();
    net.initialize(0);
    net.set_parameter("fc.bias", Tensor::new(&[1., 2., 3.], &[3]))
        .unwrap();
    assert_eq!(net.parameter("fc.bias").unwrap().to_vec(), vec![1., 2., 3.]);

    assert_err!(
        net.set_parameter("fc.bias", Tensor::zeros(&[4])),
        TestProblemError::ShapeMismatch { .. }
    );
    assert_err!(
        net.set_parameter("fc2.bias", Tensor::zeros(&[3])),
        TestProblemError::UnknownParameter(_)
    );
}

#[test]
fn test_l2_regularization_skips_bias() {
    let mut net = Network::new("tiny");
    net.add_linear("fc", 2, 1);
    net.initialize(0);
    net.set_parameter("fc.weight", Tensor::new(&[3., 4.], &[1, 2])).unwrap();
    net.set_parameter("fc.bias", Tensor::new(&[100.], &[1])).unwrap();

    // 0.1 * 0.5 * (9 + 16)
    assert_abs_diff_eq!(l2_regularization(&net, 0.1).unwrap(), 1.25, epsilon = 1e-6);
    assert_abs_diff_eq!(l2_regularization(&net, 0.0).unwrap(), 0.0, epsilon = 1e-9);
}
