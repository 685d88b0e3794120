use crate::{ErrorKind, dispatch::Conversion, formats::Job};
use rayon::iter::{IntoParallelIterator, ParallelIterator};

/// Run the conversion on horizontal bands of the image in parallel
#[inline(never)]
pub(crate) fn run(conversion: Conversion, job: Job<'_>) -> Result<(), ErrorKind> {
    let threads = num_cpus::get();

    // Bands must not split a block of subsampled chroma
    let align = job
        .src_format
        .pixel_format
        .subsampling()
        .1
        .max(job.dst_format.pixel_format.subsampling().1);

    let blocks = job.height / align;

    if threads == 1 || blocks < 2 {
        return conversion.run(job);
    }

    let band_height = blocks.div_ceil(threads) * align;

    let mut bands = Vec::with_capacity(threads);
    let mut rest = job;

    while rest.height > band_height {
        let (band, tail) = rest.split_rows(band_height);

        bands.push(band);
        rest = tail;
    }

    bands.push(rest);

    log::trace!(
        "Converting {} bands of up to {band_height} rows on {threads} threads",
        bands.len()
    );

    bands
        .into_par_iter()
        .try_for_each(|band| conversion.run(band))
}

#[cfg(test)]
mod tests {
    use crate::{ColorSpace, Context, ImageFormat, PixelFormat};

    #[test]
    fn bands_match_single_thread() {
        let context = Context::new();

        let width = 64u32;
        let height = 98u32;

        let bgra = ImageFormat::new(PixelFormat::BGRA, ColorSpace::LRGB, 1);
        let nv12 = ImageFormat::new(PixelFormat::NV12, ColorSpace::BT709, 1);

        let src: Vec<u8> = (0..width * height * 4).map(|i| (i * 7 % 251) as u8).collect();

        let mut single = vec![0u8; (width * height * 3 / 2) as usize];
        let mut multi = vec![0u8; single.len()];

        context
            .convert_image(
                width,
                height,
                &bgra,
                None,
                &[src.as_slice()],
                &nv12,
                None,
                &mut [single.as_mut_slice()],
            )
            .unwrap();

        context
            .convert_image_multi_thread(
                width,
                height,
                &bgra,
                None,
                &[src.as_slice()],
                &nv12,
                None,
                &mut [multi.as_mut_slice()],
            )
            .unwrap();

        assert_eq!(single, multi);
    }
}
