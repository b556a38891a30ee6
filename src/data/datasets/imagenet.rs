//! ImageNet（ILSVRC 2012）及通用的图像目录来源
//!
//! 目录布局：`<data_dir>/imagenet/train/<synset>/*.JPEG`、`<data_dir>/imagenet/validation/<synset>/*.JPEG`。
//! 类别按 synset 目录名排序编号，并整体后移一位：类别 0 保留给背景类，共 1001 类。
//!
//! 图像在取批次时才解码（rayon 并行），每个样本使用由批次 rng 派生的独立种子，
//! 因此并行解码的结果与线程调度无关。

use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::imageops::FilterType;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::debug;

use crate::data::config::DataSetConfig;
use crate::data::dataset::{DataSet, Splits, make_image_splits};
use crate::data::error::DataError;
use crate::data::source::SampleSource;
use crate::data::transforms::{
    center_crop, horizontal_flip, normalize_channels, one_hot_from_indices, random_crop,
};
use crate::tensor::Tensor;

pub const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
pub const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];

const IMAGENET_RESIZE: u32 = 256;
const IMAGENET_CROP: usize = 224;
const IMAGENET_NUM_CLASSES: usize = 1001;
const DEFAULT_TRAIN_EVAL_SIZE: usize = 50000;

const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "bmp"];

/// 单张图像的预处理
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTransform {
    /// 短边缩放到的长度
    pub resize: u32,
    /// 裁剪出的正方形边长
    pub crop: usize,
    /// true：随机裁剪 + 随机水平翻转；false：中心裁剪
    pub random: bool,
    pub mean: Vec<f32>,
    pub std: Vec<f32>,
}

impl ImageTransform {
    pub fn imagenet_train() -> Self {
        Self {
            resize: IMAGENET_RESIZE,
            crop: IMAGENET_CROP,
            random: true,
            mean: IMAGENET_MEAN.to_vec(),
            std: IMAGENET_STD.to_vec(),
        }
    }

    pub fn imagenet_eval() -> Self {
        Self {
            random: false,
            ..Self::imagenet_train()
        }
    }

    fn apply(&self, path: &Path, seed: u64) -> Result<Tensor, DataError> {
        let rgb = image::open(path)?.to_rgb8();
        let (w, h) = rgb.dimensions();
        let (nw, nh) = if w <= h {
            (self.resize, ((h as u64 * self.resize as u64) / w.max(1) as u64).max(1) as u32)
        } else {
            (((w as u64 * self.resize as u64) / h.max(1) as u64).max(1) as u32, self.resize)
        };
        let resized = image::imageops::resize(&rgb, nw, nh, FilterType::Triangle);
        if (nw as usize) < self.crop || (nh as usize) < self.crop {
            return Err(DataError::InvalidConfig(format!(
                "裁剪尺寸 {} 大于缩放后的图像 {nw}x{nh}",
                self.crop
            )));
        }

        // HWC 字节 → CHW 浮点 [0, 1]
        let (nw, nh) = (nw as usize, nh as usize);
        let raw = resized.as_raw();
        let mut data = vec![0.0f32; 3 * nh * nw];
        for (i, px) in raw.chunks_exact(3).enumerate() {
            for (ch, &v) in px.iter().enumerate() {
                data[ch * nh * nw + i] = f32::from(v) / 255.0;
            }
        }
        let image = Tensor::from_vec(data, &[3, nh, nw]);

        let mut rng = StdRng::seed_from_u64(seed);
        let mut out = if self.random {
            random_crop(&image, self.crop, &mut rng)
        } else {
            center_crop(&image, self.crop)
        };
        if self.random && rng.gen_bool(0.5) {
            out = horizontal_flip(&out);
        }
        Ok(normalize_channels(&out, &self.mean, &self.std))
    }
}

/// 按类别子目录组织的图像集合
#[derive(Debug, Clone)]
pub struct ImageFolder {
    root: PathBuf,
    classes: Vec<String>,
    samples: Vec<(PathBuf, usize)>,
    class_offset: usize,
    num_classes: usize,
    transform: ImageTransform,
}

impl ImageFolder {
    /// 扫描`root`下的类别子目录（按名称排序）。
    /// 类别 k 的标签为 `k + class_offset`，标签以 `num_classes` 维 one-hot 给出。
    pub fn new(
        root: &Path,
        class_offset: usize,
        num_classes: usize,
        transform: ImageTransform,
    ) -> Result<Self, DataError> {
        let classes = list_class_dirs(root)?;
        Self::with_classes(root, &classes, class_offset, num_classes, transform)
    }

    /// 使用给定的类别列表（如验证集沿用训练集的类别编号）。
    /// `root`下出现列表之外的类别目录视为格式错误。
    pub fn with_classes(
        root: &Path,
        classes: &[String],
        class_offset: usize,
        num_classes: usize,
        transform: ImageTransform,
    ) -> Result<Self, DataError> {
        if classes.len() + class_offset > num_classes {
            return Err(DataError::FormatError(format!(
                "{} 个类别目录（偏移 {class_offset}）超出类别数 {num_classes}",
                classes.len()
            )));
        }

        let mut samples = Vec::new();
        for dir in list_class_dirs(root)? {
            let Some(class) = classes.iter().position(|c| *c == dir) else {
                return Err(DataError::FormatError(format!(
                    "{} 下出现未知类别目录 {dir}",
                    root.display()
                )));
            };
            let mut files = std::fs::read_dir(root.join(&dir))?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|path| is_image(path))
                .collect::<Vec<_>>();
            files.sort();
            samples.extend(files.into_iter().map(|path| (path, class + class_offset)));
        }
        if samples.is_empty() {
            return Err(DataError::FormatError(format!(
                "{} 下没有找到图像",
                root.display()
            )));
        }
        debug!(root = %root.display(), classes = classes.len(), images = samples.len(), "已扫描图像目录");

        Ok(Self {
            root: root.to_path_buf(),
            classes: classes.to_vec(),
            samples,
            class_offset,
            num_classes,
            transform,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// 第`index`个样本的 (路径, 标签)
    pub fn sample(&self, index: usize) -> Option<(&Path, usize)> {
        self.samples.get(index).map(|(p, c)| (p.as_path(), *c))
    }

    pub fn class_offset(&self) -> usize {
        self.class_offset
    }

    /// 同一批文件，换一种预处理
    pub fn with_transform(&self, transform: ImageTransform) -> Self {
        Self {
            transform,
            ..self.clone()
        }
    }
}

fn is_image(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
}

fn list_class_dirs(root: &Path) -> Result<Vec<String>, DataError> {
    if !root.is_dir() {
        return Err(DataError::FileNotFound(root.to_path_buf()));
    }
    let mut dirs = std::fs::read_dir(root)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
        .collect::<Vec<_>>();
    dirs.sort();
    Ok(dirs)
}

impl SampleSource for ImageFolder {
    fn len(&self) -> usize {
        self.samples.len()
    }

    fn sample_shape(&self) -> Vec<usize> {
        vec![3, self.transform.crop, self.transform.crop]
    }

    fn label_shape(&self) -> Vec<usize> {
        vec![self.num_classes]
    }

    fn fetch(&self, indices: &[usize], rng: &mut StdRng) -> Result<(Tensor, Tensor), DataError> {
        let len = self.samples.len();
        if let Some(&index) = indices.iter().find(|&&i| i >= len) {
            return Err(DataError::IndexOutOfBounds { index, len });
        }

        let seeds = indices.iter().map(|_| rng.r#gen::<u64>()).collect::<Vec<_>>();
        let images = indices
            .par_iter()
            .zip(seeds.par_iter())
            .map(|(&i, &seed)| self.transform.apply(&self.samples[i].0, seed))
            .collect::<Result<Vec<_>, _>>()?;

        let refs = images.iter().collect::<Vec<_>>();
        let classes = indices.iter().map(|&i| self.samples[i].1).collect::<Vec<_>>();
        Ok((
            Tensor::stack(&refs, true),
            one_hot_from_indices(&classes, self.num_classes),
        ))
    }
}

#[derive(Debug)]
pub struct Imagenet {
    train_eval_size: usize,
    splits: Splits,
}

impl Imagenet {
    pub fn new(config: &DataSetConfig) -> Result<Self, DataError> {
        let root = config.data_dir_for("imagenet");
        let train_transform = if config.data_augmentation {
            ImageTransform::imagenet_train()
        } else {
            ImageTransform::imagenet_eval()
        };
        Self::from_dirs(
            &root.join("train"),
            &root.join("validation"),
            config,
            train_transform,
            ImageTransform::imagenet_eval(),
        )
    }

    /// 从任意的训练、测试目录构造，预处理可自定
    pub fn from_dirs(
        train_dir: &Path,
        test_dir: &Path,
        config: &DataSetConfig,
        train_transform: ImageTransform,
        eval_transform: ImageTransform,
    ) -> Result<Self, DataError> {
        config.validate()?;
        let train = ImageFolder::new(train_dir, 1, IMAGENET_NUM_CLASSES, train_transform)?;
        let valid = train.with_transform(eval_transform.clone());
        let test = ImageFolder::with_classes(
            test_dir,
            train.classes(),
            1,
            IMAGENET_NUM_CLASSES,
            eval_transform,
        )?;

        let train_eval_size = config.train_eval_size_or(DEFAULT_TRAIN_EVAL_SIZE);
        let splits = make_image_splits(
            "imagenet",
            Arc::new(train),
            Arc::new(valid),
            Arc::new(test),
            config,
            train_eval_size,
            None,
            None,
        )?;
        Ok(Self {
            train_eval_size,
            splits,
        })
    }
}

impl DataSet for Imagenet {
    fn name(&self) -> &'static str {
        "imagenet"
    }

    fn splits(&self) -> &Splits {
        &self.splits
    }

    fn train_eval_size(&self) -> usize {
        self.train_eval_size
    }

    fn num_classes(&self) -> Option<usize> {
        Some(IMAGENET_NUM_CLASSES)
    }
}
