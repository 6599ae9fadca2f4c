use std::path::Path;

use ndarray::{Array3, ArrayView3, ArrayViewMut3, Axis, Ix3};
use nifti::{IntoNdArray, NiftiObject, ReaderOptions};
use num::traits::AsPrimitive;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Dim3, VolError, VolResult};

pub mod transform;
pub mod window;

pub use transform::{Axis3, AxisFlips, TransformMatrix};
pub use window::WindowLevel;

/// `(nx, ny, nz)` -> ndarray 形状 `(nz, ny, nx)`. 以后均按照该模式存储,
/// 于是扁平下标为 `x + nx * (y + ny * z)`.
#[inline]
const fn array_shape((nx, ny, nz): Dim3) -> Dim3 {
    (nz, ny, nx)
}

/// ndarray 形状 `(nz, ny, nx)` -> `(nx, ny, nz)`.
#[inline]
const fn dims_of_shape((nz, ny, nx): Dim3) -> Dim3 {
    (nx, ny, nz)
}

/// 检查两个形状是否一致. 不一致时返回 `DimensionMismatch(expected, found)`.
#[inline]
pub fn ensure_same_dimensions(expected: Dim3, found: Dim3) -> VolResult<()> {
    if expected == found {
        Ok(())
    } else {
        Err(VolError::DimensionMismatch(expected, found))
    }
}

/// 体数据的几何元信息. 重采样的目标网格以此描述.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Geometry {
    /// 体素个数 `(nx, ny, nz)`.
    pub dims: Dim3,

    /// 体素分辨率, 以毫米为单位.
    pub spacing: [f64; 3],

    /// 原点.
    pub origin: [f64; 3],

    /// 空间变换.
    pub orientation: TransformMatrix,
}

/// 三维标量体数据, 包括名称、几何元信息和 (可能缺失的) 标量缓冲区.
///
/// 几何元信息包括:
///
/// 1. `dimensions`: 每个方向的体素个数 `(nx, ny, nz)`;
/// 2. `spacing`: 每个方向的体素分辨率, 以毫米为单位;
/// 3. `origin`: 第一个体素中心的空间坐标;
/// 4. `orientation`: 作用在该体数据上的空间变换, 默认为单位矩阵.
///
/// 若标量缓冲区存在, 其长度恒等于 `nx * ny * nz`.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VolumeBuffer<T> {
    name: String,
    dims: Dim3,
    spacing: [f64; 3],
    origin: [f64; 3],
    orientation: TransformMatrix,
    data: Option<Array3<T>>,
}

impl<T> VolumeBuffer<T> {
    /// 由 ndarray 数据直接创建. `data` 的形状必须为 `(nz, ny, nx)`.
    ///
    /// 如果 `data` 的形状与 `dims` 不一致, 返回 `DimensionMismatch`.
    pub fn new(
        name: impl Into<String>,
        dims: Dim3,
        spacing: [f64; 3],
        origin: [f64; 3],
        data: Array3<T>,
    ) -> VolResult<Self>
    where
        T: Clone,
    {
        ensure_same_dimensions(dims, dims_of_shape(data.dim()))?;
        let data = if data.is_standard_layout() {
            data
        } else {
            data.as_standard_layout().to_owned()
        };
        debug_assert!(data.is_standard_layout());

        Ok(Self {
            name: name.into(),
            dims,
            spacing,
            origin,
            orientation: TransformMatrix::identity(),
            data: Some(data),
        })
    }

    /// 由扁平缓冲区创建, 缓冲区按 `x + nx * (y + ny * z)` 排列.
    ///
    /// `raw` 长度与 `dims` 不符时返回 `Shape` 错误.
    pub fn from_raw(
        name: impl Into<String>,
        dims: Dim3,
        spacing: [f64; 3],
        origin: [f64; 3],
        raw: Vec<T>,
    ) -> VolResult<Self> {
        let data = Array3::from_shape_vec(array_shape(dims), raw)?;
        Ok(Self {
            name: name.into(),
            dims,
            spacing,
            origin,
            orientation: TransformMatrix::identity(),
            data: Some(data),
        })
    }

    /// 创建只有元信息、没有标量数据的体数据.
    pub fn without_data(
        name: impl Into<String>,
        dims: Dim3,
        spacing: [f64; 3],
        origin: [f64; 3],
    ) -> Self {
        Self {
            name: name.into(),
            dims,
            spacing,
            origin,
            orientation: TransformMatrix::identity(),
            data: None,
        }
    }

    /// 以 `self` 的几何元信息和新数据 `data` 构建另一个体数据.
    /// `data` 的形状必须与 `self` 一致, 否则返回 `DimensionMismatch`.
    pub fn derive<U>(&self, name: impl Into<String>, data: Array3<U>) -> VolResult<VolumeBuffer<U>>
    where
        U: Clone,
    {
        let mut out = VolumeBuffer::new(name, self.dims, self.spacing, self.origin, data)?;
        out.orientation = self.orientation;
        Ok(out)
    }

    /// 名称 (标识).
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 重命名.
    #[inline]
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// 体素个数 `(nx, ny, nz)`.
    #[inline]
    pub fn dimensions(&self) -> Dim3 {
        self.dims
    }

    /// 体素分辨率 `(sx, sy, sz)`, 以毫米为单位.
    #[inline]
    pub fn spacing(&self) -> [f64; 3] {
        self.spacing
    }

    /// 原点 `(ox, oy, oz)`.
    #[inline]
    pub fn origin(&self) -> [f64; 3] {
        self.origin
    }

    /// 设置原点.
    #[inline]
    pub fn set_origin(&mut self, origin: [f64; 3]) {
        self.origin = origin;
    }

    /// 当前作用于该体数据的空间变换.
    #[inline]
    pub fn orientation(&self) -> &TransformMatrix {
        &self.orientation
    }

    /// 设置空间变换.
    #[inline]
    pub fn set_orientation(&mut self, orientation: TransformMatrix) {
        self.orientation = orientation;
    }

    /// 全部几何元信息.
    #[inline]
    pub fn geometry(&self) -> Geometry {
        Geometry {
            dims: self.dims,
            spacing: self.spacing,
            origin: self.origin,
            orientation: self.orientation,
        }
    }

    /// 是否存在已分配的标量数据?
    #[inline]
    pub fn has_image_data(&self) -> bool {
        self.data.is_some()
    }

    /// 体素总数, 即 `nx * ny * nz`.
    #[inline]
    pub fn len(&self) -> usize {
        let (x, y, z) = self.dims;
        x * y * z
    }

    /// 体素总数是否为 0?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 单个体素的实际体积, 以立方毫米为单位.
    #[inline]
    pub fn voxel_volume(&self) -> f64 {
        self.spacing.iter().product()
    }

    /// 标量数据的不可变视图, 形状为 `(nz, ny, nx)`.
    /// 若没有标量数据, 返回 `IncompatibleSource`.
    #[inline]
    pub fn scalars(&self) -> VolResult<ArrayView3<'_, T>> {
        self.data
            .as_ref()
            .map(|d| d.view())
            .ok_or_else(|| VolError::IncompatibleSource(self.name.clone()))
    }

    /// 标量数据的可变视图, 形状为 `(nz, ny, nx)`.
    /// 若没有标量数据, 返回 `IncompatibleSource`.
    #[inline]
    pub fn scalars_mut(&mut self) -> VolResult<ArrayViewMut3<'_, T>> {
        match self.data.as_mut() {
            Some(d) => Ok(d.view_mut()),
            None => Err(VolError::IncompatibleSource(self.name.clone())),
        }
    }

    /// 以 `(x, y, z)` 索引获取体素值. 越界或没有标量数据时返回 `None`.
    #[inline]
    pub fn get(&self, (x, y, z): Dim3) -> Option<&T> {
        self.data.as_ref()?.get((z, y, x))
    }

    /// 替换标量数据. `data` 的形状必须为 `(nz, ny, nx)`.
    pub fn set_scalars(&mut self, data: Array3<T>) -> VolResult<()>
    where
        T: Clone,
    {
        ensure_same_dimensions(self.dims, dims_of_shape(data.dim()))?;
        self.data = Some(if data.is_standard_layout() {
            data
        } else {
            data.as_standard_layout().to_owned()
        });
        Ok(())
    }

    /// 按 `x + nx * (y + ny * z)` 的顺序复制出扁平缓冲区.
    pub fn to_raw_vec(&self) -> VolResult<Vec<T>>
    where
        T: Clone,
    {
        Ok(self.scalars()?.iter().cloned().collect())
    }
}

impl<T: Clone> VolumeBuffer<T> {
    /// 克隆体数据并赋予新名称 `name`.
    ///
    /// 新体数据与源体数据的几何元信息完全一致, 标量缓冲区长度与类型相同,
    /// 值为源数据的拷贝. 若源数据没有标量数据, 返回 `IncompatibleSource`.
    pub fn clone_as(&self, name: impl Into<String>) -> VolResult<Self> {
        let data = self.scalars()?.to_owned();
        let name = name.into();
        log::debug!("cloning `{}` into `{name}`", self.name);
        Ok(Self {
            name,
            dims: self.dims,
            spacing: self.spacing,
            origin: self.origin,
            orientation: self.orientation,
            data: Some(data),
        })
    }
}

impl<T: AsPrimitive<f64>> VolumeBuffer<T> {
    /// 以 `window` 将标量数据映射为 8-bit 显示灰度. 无意义的值 (如 NaN) 映射为 0.
    pub fn to_display(&self, window: &WindowLevel) -> VolResult<Array3<u8>> {
        Ok(self
            .scalars()?
            .mapv(|v| window.eval(v.as_()).unwrap_or(u8::MIN)))
    }
}

/// 可以从 nifti 文件读取的标量类型.
pub trait NiftiScalar: Sized {
    /// 打开 `path` 处的 nii (或 nii.gz) 文件.
    fn read_volume(path: &Path) -> VolResult<VolumeBuffer<Self>>;
}

/// 为具体标量类型实现 nifti 文件加载.
macro_rules! impl_nifti_scalar {
    ($($t: ty),+) => {
        $(
            impl NiftiScalar for $t {
                fn read_volume(path: &Path) -> VolResult<VolumeBuffer<$t>> {
                    let obj = ReaderOptions::new().read_file(path)?;
                    let header = obj.header();
                    let [_, sx, sy, sz, ..] = header.pixdim;
                    let spacing = [sx as f64, sy as f64, sz as f64];
                    let origin = [
                        header.quatern_x as f64,
                        header.quatern_y as f64,
                        header.quatern_z as f64,
                    ];

                    let mut data = obj.into_volume().into_ndarray::<$t>()?;
                    // 去掉长度为 1 的尾部轴, 如只有一个时间步的 4-D 文件.
                    while data.ndim() > 3 && data.shape()[data.ndim() - 1] == 1 {
                        let last = data.ndim() - 1;
                        data = data.index_axis_move(Axis(last), 0);
                    }

                    // [x, y, z] -> [z, y, x]. 非三维数据返回 `Shape` 错误.
                    let data = data.into_dimensionality::<Ix3>()?.permuted_axes([2, 1, 0]);
                    let dims = dims_of_shape(data.dim());

                    let name = volume_name_of(path);
                    log::debug!("loaded `{name}` {dims:?} from {}", path.display());
                    VolumeBuffer::new(name, dims, spacing, origin, data)
                }
            }
        )+
    };
}

impl_nifti_scalar!(u8, i16, u16, f32);

impl<T: NiftiScalar> VolumeBuffer<T> {
    /// 打开 nii (或 nii.gz) 文件格式的三维体数据, 名称取自文件名主干.
    /// 体数据的原点取自 header 的 `quatern_*` (qoffset) 字段, 空间变换为单位矩阵.
/// 长度为 1 的尾部轴会被去掉, 其余非三维数据返回 `Shape` 错误.
    #[inline]
    pub fn open<P: AsRef<Path>>(path: P) -> VolResult<Self> {
        T::read_volume(path.as_ref())
    }
}

/// 由 `avolume_ts1.nii.gz` 这类路径得到 `avolume_ts1`.
fn volume_name_of(path: &Path) -> String {
    let stem = path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    stem.trim_end_matches(".gz")
        .trim_end_matches(".nii")
        .to_string()
}
