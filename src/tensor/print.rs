use crate::tensor::Tensor;
use std::fmt;

/// 每个维度最多展示的元素个数，超出部分用`..`省略
const MAX_SHOWN: usize = 6;

impl fmt::Display for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let shape = self.shape();
        match shape.len() {
            0 => write!(f, "{:8.4}", self.as_slice()[0])?,
            1 => write_row(f, self.as_slice())?,
            2 => {
                let cols = shape[1];
                let rows: Vec<&[f32]> = self.as_slice().chunks(cols.max(1)).collect();
                write!(f, "[")?;
                for (i, row) in rows.iter().enumerate() {
                    if i == MAX_SHOWN / 2 && rows.len() > MAX_SHOWN {
                        write!(f, "\n ..")?;
                        continue;
                    }
                    if i > MAX_SHOWN / 2 && i < rows.len() - MAX_SHOWN / 2 && rows.len() > MAX_SHOWN {
                        continue;
                    }
                    if i > 0 {
                        write!(f, "\n ")?;
                    }
                    write_row(f, row)?;
                }
                write!(f, "]")?;
            }
            _ => write!(
                f,
                "<对于阶数大于二（rank>2）的张量无法展示具体数据，均值为{:.4}>",
                self.mean()
            )?,
        }
        writeln!(f, "\n形状: {shape:?}")
    }
}

fn write_row(f: &mut fmt::Formatter, row: &[f32]) -> fmt::Result {
    write!(f, "[")?;
    for (i, v) in row.iter().enumerate() {
        if row.len() > MAX_SHOWN && i >= MAX_SHOWN / 2 && i < row.len() - MAX_SHOWN / 2 {
            if i == MAX_SHOWN / 2 {
                write!(f, "   .. ")?;
            }
            continue;
        }
        write!(f, "{v:8.4}")?;
        if i != row.len() - 1 {
            write!(f, ", ")?;
        }
    }
    write!(f, "]")
}
