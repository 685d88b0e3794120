use crate::{
    ErrorKind, ImageFormat,
    dispatch::{self, Conversion},
    formats::Job,
    image_format::Layout,
    planes::{read_planes, read_planes_mut},
    vector::{CpuManufacturer, InstructionSet},
};

/// Selected kernel variant family, holding one is the proof that conversions can run
///
/// Create one with [`Context::new`] and keep it around, or use the process wide instance
/// through [`initialize`](crate::initialize).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Context {
    manufacturer: CpuManufacturer,
    instruction_set: InstructionSet,
}

impl Context {
    /// Inspect the host CPU and select the best instruction set it supports
    pub fn new() -> Self {
        let context = Self {
            manufacturer: CpuManufacturer::detect(),
            instruction_set: InstructionSet::detect(),
        };

        log::debug!(
            "Detected {} CPU, using {} kernels",
            context.manufacturer,
            context.instruction_set
        );

        context
    }

    /// Create a context pinned to the given instruction set
    ///
    /// Fails with [`ErrorKind::InvalidOperation`] if the host cannot run it.
    pub fn with_instruction_set(instruction_set: InstructionSet) -> Result<Self, ErrorKind> {
        if !instruction_set.is_supported() {
            log::warn!("Instruction set {instruction_set} is not supported by this CPU");
            return Err(ErrorKind::InvalidOperation);
        }

        log::debug!("Pinned instruction set to {instruction_set}");

        Ok(Self {
            manufacturer: CpuManufacturer::detect(),
            instruction_set,
        })
    }

    pub fn manufacturer(&self) -> CpuManufacturer {
        self.manufacturer
    }

    pub fn instruction_set(&self) -> InstructionSet {
        self.instruction_set
    }

    /// Describe the selected acceleration, e.g. `{cpu-manufacturer:Intel,instruction-set:Avx2}`
    pub fn describe(&self) -> String {
        format!(
            "{{cpu-manufacturer:{},instruction-set:{}}}",
            self.manufacturer, self.instruction_set
        )
    }

    /// Compute the size in bytes of every buffer of an image, see [`ImageFormat::buffers_size`]
    pub fn get_buffers_size(
        &self,
        width: u32,
        height: u32,
        format: &ImageFormat,
        strides: Option<&[usize]>,
        buffers_size: &mut [usize],
    ) -> Result<(), ErrorKind> {
        format.buffers_size(width as usize, height as usize, strides, buffers_size)
    }

    /// Convert an image from `src_format` to `dst_format`
    ///
    /// Strides may be `None` or contain [`STRIDE_AUTO`](crate::STRIDE_AUTO) for tightly packed
    /// planes. Every check happens before the first destination byte is written.
    #[allow(clippy::too_many_arguments)]
    pub fn convert_image(
        &self,
        width: u32,
        height: u32,
        src_format: &ImageFormat,
        src_strides: Option<&[usize]>,
        src_buffers: &[&[u8]],
        dst_format: &ImageFormat,
        dst_strides: Option<&[usize]>,
        dst_buffers: &mut [&mut [u8]],
    ) -> Result<(), ErrorKind> {
        let (conversion, job) = self.prepare(
            width,
            height,
            src_format,
            src_strides,
            src_buffers,
            dst_format,
            dst_strides,
            dst_buffers,
        )?;

        conversion.run(job)
    }

    /// Same as [`Context::convert_image`], but converts bands of rows on the rayon thread pool
    ///
    /// The output is identical to the single threaded conversion.
    #[cfg(feature = "multi-thread")]
    #[allow(clippy::too_many_arguments)]
    pub fn convert_image_multi_thread(
        &self,
        width: u32,
        height: u32,
        src_format: &ImageFormat,
        src_strides: Option<&[usize]>,
        src_buffers: &[&[u8]],
        dst_format: &ImageFormat,
        dst_strides: Option<&[usize]>,
        dst_buffers: &mut [&mut [u8]],
    ) -> Result<(), ErrorKind> {
        let (conversion, job) = self.prepare(
            width,
            height,
            src_format,
            src_strides,
            src_buffers,
            dst_format,
            dst_strides,
            dst_buffers,
        )?;

        crate::multi_thread::run(conversion, job)
    }

    #[allow(clippy::too_many_arguments)]
    fn prepare<'a>(
        &self,
        width: u32,
        height: u32,
        src_format: &ImageFormat,
        src_strides: Option<&[usize]>,
        src_buffers: &[&'a [u8]],
        dst_format: &ImageFormat,
        dst_strides: Option<&[usize]>,
        dst_buffers: &'a mut [&mut [u8]],
    ) -> Result<(Conversion, Job<'a>), ErrorKind> {
        let width = width as usize;
        let height = height as usize;

        src_format.validate(width, height)?;
        dst_format.validate(width, height)?;

        let conversion = dispatch::resolve(src_format.pixel_format, dst_format.pixel_format)
            .ok_or(ErrorKind::InvalidOperation)?;

        let src_layout = Layout::new(src_format, width, height, src_strides)?;
        let dst_layout = Layout::new(dst_format, width, height, dst_strides)?;

        let job = Job {
            set: self.instruction_set,
            width,
            height,
            src_format: *src_format,
            dst_format: *dst_format,
            src: read_planes(&src_layout, src_buffers)?,
            dst: read_planes_mut(&dst_layout, dst_buffers)?,
        };

        Ok((conversion, job))
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
