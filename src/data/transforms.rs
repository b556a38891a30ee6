//! 数据变换函数
//!
//! 提供常用的数据预处理操作，如归一化、one-hot 编码等，
//! 以及作用于单张 `[C, H, W]` 图像（像素值在 [0, 1]）的数据增强。

use rand::Rng;
use rand::seq::SliceRandom;

use crate::tensor::Tensor;

/// 将 0-255 像素值归一化到 0-1
///
/// # 参数
/// - `tensor`: 输入 Tensor，值范围 [0, 255]
///
/// # 返回
/// 归一化后的 Tensor，值范围 [0, 1]
pub fn normalize_pixels(tensor: &Tensor) -> Tensor {
    tensor / 255.0
}

/// 将类别索引转换为 one-hot 编码
///
/// # 参数
/// - `labels`: 类别索引 Tensor，形状 [N] 或 [N, 1]，值为 0..num_classes
/// - `num_classes`: 类别总数
///
/// # 返回
/// one-hot 编码 Tensor，形状 [N, num_classes]；越界的类别索引对应全零行
///
/// # 示例
/// ```ignore
/// let labels = Tensor::new(&[0.0, 2.0, 1.0], &[3]);
/// let one_hot = one_hot(&labels, 3);
/// // 结果: [[1,0,0], [0,0,1], [0,1,0]]
/// ```
pub fn one_hot(labels: &Tensor, num_classes: usize) -> Tensor {
    let classes = labels
        .as_slice()
        .iter()
        .map(|&c| c as usize)
        .collect::<Vec<_>>();
    one_hot_from_indices(&classes, num_classes)
}

/// 同[`one_hot`]，但直接接受类别下标
pub fn one_hot_from_indices(classes: &[usize], num_classes: usize) -> Tensor {
    let n = classes.len();
    let mut data = vec![0.0; n * num_classes];
    for (i, &class_idx) in classes.iter().enumerate() {
        if class_idx < num_classes {
            data[i * num_classes + class_idx] = 1.0;
        }
    }
    Tensor::from_vec(data, &[n, num_classes])
}

/// 展平图像
///
/// # 参数
/// - `tensor`: 输入 Tensor
///   - 形状 [N, C, H, W] → 输出 [N, C*H*W]
///   - 形状 [N, H, W] → 输出 [N, H*W]
///
/// # 返回
/// 展平后的 Tensor
pub fn flatten_images(tensor: &Tensor) -> Tensor {
    let shape = tensor.shape();
    match shape.len() {
        3 | 4 => {
            let n = shape[0];
            let flat_size = shape[1..].iter().product::<usize>();
            tensor.reshape(&[n, flat_size])
        }
        _ => tensor.flatten(),
    }
}

/// 取 `[C, H, W]` 图像的三个维度
fn chw(image: &Tensor) -> (usize, usize, usize) {
    let shape = image.shape();
    assert_eq!(shape.len(), 3, "图像张量必须为 [C, H, W]，实际形状 {shape:?}");
    (shape[0], shape[1], shape[2])
}

/// 镜像下标（不重复边缘像素，与 PyTorch 的 reflect 模式一致）
fn reflect_index(i: isize, n: usize) -> usize {
    let n = n as isize;
    if n == 1 {
        return 0;
    }
    let period = 2 * (n - 1);
    let mut i = i.rem_euclid(period);
    if i >= n {
        i = period - i;
    }
    i as usize
}

/// 以镜像方式在图像四周各填充 `padding` 个像素
pub fn pad_reflect(image: &Tensor, padding: usize) -> Tensor {
    if padding == 0 {
        return image.clone();
    }
    let (c, h, w) = chw(image);
    let (new_h, new_w) = (h + 2 * padding, w + 2 * padding);
    let src = image.as_slice();
    let mut data = Vec::with_capacity(c * new_h * new_w);
    for ch in 0..c {
        for y in 0..new_h {
            let sy = reflect_index(y as isize - padding as isize, h);
            for x in 0..new_w {
                let sx = reflect_index(x as isize - padding as isize, w);
                data.push(src[(ch * h + sy) * w + sx]);
            }
        }
    }
    Tensor::from_vec(data, &[c, new_h, new_w])
}

/// 从 `(top, left)` 处裁剪出 `height × width` 的区域
pub fn crop(image: &Tensor, top: usize, left: usize, height: usize, width: usize) -> Tensor {
    let (c, h, w) = chw(image);
    assert!(
        top + height <= h && left + width <= w,
        "裁剪区域超出图像范围：图像 {h}x{w}，区域 ({top}, {left}) + {height}x{width}"
    );
    let src = image.as_slice();
    let mut data = Vec::with_capacity(c * height * width);
    for ch in 0..c {
        for y in top..top + height {
            let row = (ch * h + y) * w;
            data.extend_from_slice(&src[row + left..row + left + width]);
        }
    }
    Tensor::from_vec(data, &[c, height, width])
}

/// 随机裁剪出 `size × size` 的区域
pub fn random_crop<R: Rng + ?Sized>(image: &Tensor, size: usize, rng: &mut R) -> Tensor {
    let (_, h, w) = chw(image);
    assert!(size <= h && size <= w, "裁剪尺寸 {size} 大于图像 {h}x{w}");
    let top = rng.gen_range(0..=h - size);
    let left = rng.gen_range(0..=w - size);
    crop(image, top, left, size, size)
}

/// 居中裁剪出 `size × size` 的区域
pub fn center_crop(image: &Tensor, size: usize) -> Tensor {
    let (_, h, w) = chw(image);
    assert!(size <= h && size <= w, "裁剪尺寸 {size} 大于图像 {h}x{w}");
    crop(image, (h - size) / 2, (w - size) / 2, size, size)
}

/// 水平翻转
pub fn horizontal_flip(image: &Tensor) -> Tensor {
    let (c, h, w) = chw(image);
    let src = image.as_slice();
    let mut data = Vec::with_capacity(c * h * w);
    for row in src.chunks(w) {
        data.extend(row.iter().rev());
    }
    Tensor::from_vec(data, &[c, h, w])
}

/// 按通道做 `(x - mean) / std` 标准化
pub fn normalize_channels(image: &Tensor, mean: &[f32], std: &[f32]) -> Tensor {
    let (c, h, w) = chw(image);
    assert!(
        mean.len() == c && std.len() == c,
        "均值/标准差的长度必须等于通道数 {c}"
    );
    let plane = h * w;
    let data = image
        .as_slice()
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            let ch = i / plane;
            (v - mean[ch]) / std[ch]
        })
        .collect();
    Tensor::from_vec(data, &[c, h, w])
}

/// RGB 图像的灰度（ITU-R 601-2 luma）
fn grayscale(image: &Tensor) -> Vec<f32> {
    let (c, h, w) = chw(image);
    let src = image.as_slice();
    let plane = h * w;
    if c == 1 {
        return src.to_vec();
    }
    (0..plane)
        .map(|i| 0.299 * src[i] + 0.587 * src[plane + i] + 0.114 * src[2 * plane + i])
        .collect()
}

/// 将图像与`other`按`factor`混合：`factor * image + (1 - factor) * other`，结果截断到 [0, 1]
fn blend(image: &Tensor, other: impl Fn(usize) -> f32, factor: f32) -> Tensor {
    let data = image
        .as_slice()
        .iter()
        .enumerate()
        .map(|(i, &v)| (factor * v + (1.0 - factor) * other(i)).clamp(0.0, 1.0))
        .collect();
    Tensor::from_vec(data, image.shape())
}

pub fn adjust_brightness(image: &Tensor, factor: f32) -> Tensor {
    blend(image, |_| 0.0, factor)
}

pub fn adjust_contrast(image: &Tensor, factor: f32) -> Tensor {
    let gray = grayscale(image);
    let mean = gray.iter().sum::<f32>() / gray.len().max(1) as f32;
    blend(image, |_| mean, factor)
}

pub fn adjust_saturation(image: &Tensor, factor: f32) -> Tensor {
    let (_, h, w) = chw(image);
    let plane = h * w;
    let gray = grayscale(image);
    blend(image, |i| gray[i % plane], factor)
}

/// 随机调整亮度、对比度、饱和度，三者以随机顺序作用
#[derive(Debug, Clone, PartialEq)]
pub struct ColorJitter {
    pub brightness: Option<(f32, f32)>,
    pub contrast: Option<(f32, f32)>,
    pub saturation: Option<(f32, f32)>,
}

impl ColorJitter {
    /// `brightness` 为相对幅度 b，因子取自 `[max(0, 1-b), 1+b]`；
    /// `contrast`、`saturation` 直接给出因子区间
    pub fn new(brightness: f32, contrast: (f32, f32), saturation: (f32, f32)) -> Self {
        Self {
            brightness: Some(((1.0 - brightness).max(0.0), 1.0 + brightness)),
            contrast: Some(contrast),
            saturation: Some(saturation),
        }
    }

    pub fn apply<R: Rng + ?Sized>(&self, image: &Tensor, rng: &mut R) -> Tensor {
        let mut order = [0u8, 1, 2];
        order.shuffle(rng);
        let mut out = image.clone();
        for op in order {
            let (range, adjust): (Option<(f32, f32)>, fn(&Tensor, f32) -> Tensor) = match op {
                0 => (self.brightness, adjust_brightness),
                1 => (self.contrast, adjust_contrast),
                _ => (self.saturation, adjust_saturation),
            };
            if let Some((lo, hi)) = range {
                let factor = if hi > lo { rng.gen_range(lo..=hi) } else { lo };
                out = adjust(&out, factor);
            }
        }
        out
    }
}

/// 逐样本的图像变换流水线：填充 → 随机裁剪 → 随机翻转 → 颜色抖动 → 标准化
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Augmentation {
    pub padding: usize,
    pub crop_size: Option<usize>,
    pub flip_probability: f32,
    pub color_jitter: Option<ColorJitter>,
    pub normalize: Option<(Vec<f32>, Vec<f32>)>,
}

impl Augmentation {
    /// 仅做标准化（用于验证集、测试集与关闭数据增强的训练集）
    pub fn normalize_only(mean: &[f32], std: &[f32]) -> Self {
        Self {
            normalize: Some((mean.to_vec(), std.to_vec())),
            ..Self::default()
        }
    }

    /// CIFAR 风格的训练增强：镜像填充 2、随机裁剪 32、水平翻转、颜色抖动、标准化
    pub fn cifar(mean: &[f32], std: &[f32]) -> Self {
        Self {
            padding: 2,
            crop_size: Some(32),
            flip_probability: 0.5,
            color_jitter: Some(ColorJitter::new(63.0 / 255.0, (0.2, 1.8), (0.5, 1.5))),
            normalize: Some((mean.to_vec(), std.to_vec())),
        }
    }

    /// SVHN 的训练增强：与 CIFAR 相同但不做水平翻转（数字翻转后语义改变）
    pub fn svhn(mean: &[f32], std: &[f32]) -> Self {
        Self {
            flip_probability: 0.0,
            ..Self::cifar(mean, std)
        }
    }

    pub fn apply<R: Rng + ?Sized>(&self, image: &Tensor, rng: &mut R) -> Tensor {
        let mut out = pad_reflect(image, self.padding);
        if let Some(size) = self.crop_size {
            out = random_crop(&out, size, rng);
        }
        if self.flip_probability > 0.0 && rng.r#gen::<f32>() < self.flip_probability {
            out = horizontal_flip(&out);
        }
        if let Some(jitter) = &self.color_jitter {
            out = jitter.apply(&out, rng);
        }
        if let Some((mean, std)) = &self.normalize {
            out = normalize_channels(&out, mean, std);
        }
        out
    }
}
