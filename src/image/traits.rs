/// Row-oriented read access to an owned analysis plane.
pub trait ImageView {
    type Pixel: Copy;

    fn row(&self, y: usize) -> &[Self::Pixel];
}

pub trait ImageViewMut: ImageView {
    fn row_mut(&mut self, y: usize) -> &mut [Self::Pixel];
}
