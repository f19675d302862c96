use burn::tensor::backend::Backend;
use burn::tensor::ops::ConvOptions;
use burn::tensor::Tensor;

/// Default smoothing strength, in grid cells.
pub const DEFAULT_SIGMA: f64 = 3.0;

/// Isotropic Gaussian smoothing filter for 2-D grids.
///
/// Applies the same standard deviation along both axes using separable 1-D
/// convolutions. Sigma is expressed in grid cells; the output has the same
/// shape and numeric domain as the input (values are not clamped or
/// re-quantized). Convolution is zero-padded at the borders.
pub struct GaussianFilter<B: Backend> {
    sigma: f64,
    max_kernel_width: usize,
    _b: std::marker::PhantomData<B>,
}

impl<B: Backend> GaussianFilter<B> {
    /// Create a new Gaussian filter with the given standard deviation.
    ///
    /// A sigma at or below zero turns the filter into a pass-through: `apply`
    /// returns the input unchanged.
    pub fn new(sigma: f64) -> Self {
        Self {
            sigma,
            max_kernel_width: 32, // Default max kernel width to prevent excessive computation
            _b: std::marker::PhantomData,
        }
    }

    /// Set the maximum kernel width (radius * 2 + 1).
    pub fn with_max_kernel_width(mut self, width: usize) -> Self {
        self.max_kernel_width = width;
        self
    }

    /// Apply the filter to a 2-D grid.
    pub fn apply(&self, input: Tensor<B, 2>) -> Tensor<B, 2> {
        // Pass-through for vanishing sigma
        if self.sigma <= 1e-6 {
            return input;
        }

        let device = input.device();
        let radius = (3.0 * self.sigma).ceil() as usize;
        let width = (2 * radius + 1).min(self.max_kernel_width);
        let actual_radius = (width - 1) / 2;

        let kernel = self.generate_kernel(actual_radius);
        let kernel = Tensor::<B, 1>::from_floats(kernel.as_slice(), &device);

        // Separable convolution: rows first, then columns via a transpose
        let smoothed = Self::convolve_rows(input, kernel.clone());
        Self::convolve_rows(smoothed.swap_dims(0, 1), kernel).swap_dims(0, 1)
    }

    fn generate_kernel(&self, radius: usize) -> Vec<f32> {
        let mut kernel = Vec::with_capacity(2 * radius + 1);
        let mut sum = 0.0;
        let two_sigma2 = 2.0 * self.sigma * self.sigma;

        for i in 0..=(2 * radius) {
            let x = (i as f64) - (radius as f64);
            let val = (-x * x / two_sigma2).exp(); // Unnormalized Gaussian
            kernel.push(val as f32);
            sum += val;
        }

        // Normalize
        for val in &mut kernel {
            *val /= sum as f32;
        }

        kernel
    }

    /// Convolve each row of the grid with the 1-D kernel.
    fn convolve_rows(input: Tensor<B, 2>, kernel: Tensor<B, 1>) -> Tensor<B, 2> {
        let [rows, cols] = input.dims();
        let kernel_size = kernel.dims()[0];

        // conv1d wants [Batch, Channels=1, Length] and a
        // [OutChannels=1, InChannels=1, KernelSize] weight
        let input_reshaped = input.reshape([rows, 1, cols]);
        let kernel_reshaped = kernel.reshape([1, 1, kernel_size]);

        // Odd kernel width with padding = floor(k/2) preserves the length
        let padding = kernel_size / 2;
        let options = ConvOptions::new([1], [padding], [1], 1);
        let output = burn::tensor::module::conv1d(input_reshaped, kernel_reshaped, None, options);

        output.reshape([rows, cols])
    }
}

impl<B: Backend> Default for GaussianFilter<B> {
    fn default() -> Self {
        Self::new(DEFAULT_SIGMA)
    }
}
