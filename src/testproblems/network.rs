/*
 * @Description  : 网络参数登记表
 *
 * 只记录网络有哪些参数、形状与初始化方式，不负责前向/反向计算。
 * 参数在 `initialize()` 时才真正分配，便于在不占用大量内存的情况下检查网络结构。
 */

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::debug;

use super::error::TestProblemError;
use crate::tensor::Tensor;

/// 参数初始化方式
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Init {
    /// 全零
    Zeros,
    /// 常数
    Constant(f32),
    /// Xavier/Glorot 正态分布：std = sqrt(2 / (fan_in + fan_out))
    XavierNormal,
}

impl Init {
    pub fn generate_with_rng(&self, shape: &[usize], rng: &mut StdRng) -> Tensor {
        match self {
            Self::Zeros => Tensor::zeros(shape),
            Self::Constant(v) => Tensor::full(*v, shape),
            Self::XavierNormal => {
                let (fan_in, fan_out) = fans(shape);
                let std = (2.0 / (fan_in + fan_out).max(1) as f32).sqrt();
                Tensor::new_normal_with_rng(0.0, std, shape, rng)
            }
        }
    }
}

/// 权重的 (fan_in, fan_out)
///
/// 全连接权重 `[out, in]`；卷积核 `[out, in, kh, kw]`，感受野大小计入两者
fn fans(shape: &[usize]) -> (usize, usize) {
    match shape {
        [] => (1, 1),
        [n] => (*n, *n),
        [out, inp, rest @ ..] => {
            let receptive = rest.iter().product::<usize>();
            (inp * receptive, out * receptive)
        }
    }
}

#[derive(Debug, Clone)]
struct Parameter {
    name: String,
    shape: Vec<usize>,
    init: Init,
    value: Option<Tensor>,
}

/// 按登记顺序保存的具名参数
#[derive(Debug, Clone)]
pub struct Network {
    name: String,
    parameters: Vec<Parameter>,
}

impl Network {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            parameters: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 登记一个参数（尚未分配）
    pub fn add_parameter(&mut self, name: &str, shape: &[usize], init: Init) -> &mut Self {
        self.parameters.push(Parameter {
            name: name.to_string(),
            shape: shape.to_vec(),
            init,
            value: None,
        });
        self
    }

    /// 带偏置的全连接层：`{name}.weight [out, in]`、`{name}.bias [out]`
    pub fn add_linear(&mut self, name: &str, in_features: usize, out_features: usize) -> &mut Self {
        self.add_parameter(
            &format!("{name}.weight"),
            &[out_features, in_features],
            Init::XavierNormal,
        )
        .add_parameter(&format!("{name}.bias"), &[out_features], Init::Zeros)
    }

    /// 带偏置的卷积层：`{name}.weight [out, in, k, k]`、`{name}.bias [out]`
    pub fn add_conv2d(&mut self, name: &str, in_channels: usize, out_channels: usize, kernel: usize) -> &mut Self {
        self.add_parameter(
            &format!("{name}.weight"),
            &[out_channels, in_channels, kernel, kernel],
            Init::XavierNormal,
        )
        .add_parameter(&format!("{name}.bias"), &[out_channels], Init::Zeros)
    }

    /// (参数名, 形状)，按登记顺序
    pub fn named_shapes(&self) -> Vec<(&str, &[usize])> {
        self.parameters
            .iter()
            .map(|p| (p.name.as_str(), p.shape.as_slice()))
            .collect()
    }

    /// 参数张量的个数
    pub fn num_tensors(&self) -> usize {
        self.parameters.len()
    }

    /// 标量参数总数
    pub fn num_parameters(&self) -> usize {
        self.parameters
            .iter()
            .map(|p| p.shape.iter().product::<usize>())
            .sum()
    }

    pub fn is_initialized(&self) -> bool {
        self.parameters.iter().all(|p| p.value.is_some())
    }

    /// 按登记顺序、用同一个种子依次初始化全部参数
    pub fn initialize(&mut self, seed: u64) {
        let mut rng = StdRng::seed_from_u64(seed);
        for p in &mut self.parameters {
            p.value = Some(p.init.generate_with_rng(&p.shape, &mut rng));
        }
        debug!(
            network = %self.name,
            tensors = self.parameters.len(),
            scalars = self.num_parameters(),
            "网络参数已初始化"
        );
    }

    /// 已初始化的 (参数名, 张量)
    pub fn named_parameters(&self) -> Result<Vec<(&str, &Tensor)>, TestProblemError> {
        self.parameters
            .iter()
            .map(|p| match &p.value {
                Some(v) => Ok((p.name.as_str(), v)),
                None => Err(TestProblemError::NotInitialized(p.name.clone())),
            })
            .collect()
    }

    pub fn parameter(&self, name: &str) -> Option<&Tensor> {
        self.parameters
            .iter()
            .find(|p| p.name == name)
            .and_then(|p| p.value.as_ref())
    }

    /// 用外部计算得到的值替换某个参数（如优化器更新后写回）
    pub fn set_parameter(&mut self, name: &str, value: Tensor) -> Result<(), TestProblemError> {
        let p = self
            .parameters
            .iter_mut()
            .find(|p| p.name == name)
            .ok_or_else(|| TestProblemError::UnknownParameter(name.to_string()))?;
        if p.shape != value.shape() {
            return Err(TestProblemError::ShapeMismatch {
                expected: p.shape.clone(),
                got: value.shape().to_vec(),
            });
        }
        p.value = Some(value);
        Ok(())
    }
}

/// VGG 各变体的卷积配置：`Some(c)` 为输出 c 通道的 3x3 卷积，`None` 为 2x2 最大池化
fn vgg_config(variant: usize) -> Option<Vec<Option<usize>>> {
    let convs_per_block: [usize; 5] = match variant {
        16 => [2, 2, 3, 3, 3],
        19 => [2, 2, 4, 4, 4],
        _ => return None,
    };
    let widths = [64, 128, 256, 512, 512];
    let mut config = Vec::new();
    for (n, width) in convs_per_block.into_iter().zip(widths) {
        config.extend(std::iter::repeat_n(Some(width), n));
        config.push(None);
    }
    Some(config)
}

/// VGG16 / VGG19 的参数登记表
///
/// 输入图像先缩放到 224x224，经过五个卷积块后为 `512x7x7`，
/// 再接 4096、4096、`num_outputs` 三个全连接层。
/// 卷积层命名为 `conv{块}_{序号}`，全连接层为 `fc1`..`fc3`。
pub fn net_vgg(num_outputs: usize, variant: usize) -> Result<Network, TestProblemError> {
    let config = vgg_config(variant).ok_or_else(|| {
        TestProblemError::InvalidConfig(format!("VGG 只支持 16 与 19 两种变体，得到 {variant}"))
    })?;
    if num_outputs == 0 {
        return Err(TestProblemError::InvalidConfig(
            "num_outputs 必须大于 0".to_string(),
        ));
    }

    let mut net = Network::new(&format!("vgg{variant}"));
    let (mut block, mut index, mut in_channels) = (1, 1, 3);
    for layer in config {
        match layer {
            Some(width) => {
                net.add_conv2d(&format!("conv{block}_{index}"), in_channels, width, 3);
                in_channels = width;
                index += 1;
            }
            None => {
                block += 1;
                index = 1;
            }
        }
    }
    net.add_linear("fc1", 512 * 7 * 7, 4096)
        .add_linear("fc2", 4096, 4096)
        .add_linear("fc3", 4096, num_outputs);
    Ok(net)
}
