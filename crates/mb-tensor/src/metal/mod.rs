// Metal GPU compute backend (macOS only).
//
// The kernel in matmul.metal is compiled once when the backend is created.
// Each multiply uploads both operands into shared-storage buffers, dispatches
// one GPU thread per output cell over an n x n grid and blocks on
// `waitUntilCompleted` before reading the product back.

use std::ffi::c_void;
use std::mem::{size_of, size_of_val};
use std::ptr::NonNull;

use mb_signal::{Precision, Scalar};
use objc2::rc::Retained;
use objc2::runtime::ProtocolObject;
use objc2_foundation::NSString;
use objc2_metal::{
    MTLBuffer, MTLCommandBuffer, MTLCommandEncoder, MTLCommandQueue, MTLComputeCommandEncoder,
    MTLComputePipelineState, MTLCreateSystemDefaultDevice, MTLDevice, MTLLibrary,
    MTLResourceOptions, MTLSize,
};
use tracing::debug;

use crate::backend::{require_precision, MatMulBackend};
use crate::cpu::matmul::square_dimension;
use crate::error::{MatrixError, Result};

const KERNEL_SOURCE: &str = include_str!("matmul.metal");
const KERNEL_NAME: &str = "matmul_cell";
const BACKEND: &str = "metal";

/// Precisions the kernel is compiled for. Metal has no double type.
pub const SUPPORTED: &[Precision] = &[Precision::F32];

type Buffer = Retained<ProtocolObject<dyn MTLBuffer>>;

/// Metal backend: system default device, one command queue and the
/// compiled `matmul_cell` pipeline.
pub struct MetalBackend {
    device: Retained<ProtocolObject<dyn MTLDevice>>,
    queue: Retained<ProtocolObject<dyn MTLCommandQueue>>,
    pipeline: Retained<ProtocolObject<dyn MTLComputePipelineState>>,
}

// SAFETY: MTLDevice, MTLCommandQueue and MTLComputePipelineState are
// thread-safe Metal objects. Command buffers and encoders are created per
// call and never leave it.
unsafe impl Send for MetalBackend {}
unsafe impl Sync for MetalBackend {}

impl MetalBackend {
    /// Acquire the default Metal device and compile the kernel.
    ///
    /// # Errors
    /// Returns `CapabilityUnavailable` if there is no device or the queue or
    /// pipeline cannot be created.
    pub fn new() -> Result<Self> {
        let device = MTLCreateSystemDefaultDevice()
            .ok_or_else(|| MatrixError::unavailable(BACKEND, "no Metal device found"))?;
        let queue = device
            .newCommandQueue()
            .ok_or_else(|| MatrixError::unavailable(BACKEND, "failed to create command queue"))?;

        let source = NSString::from_str(KERNEL_SOURCE);
        let library = device
            .newLibraryWithSource_options_error(&source, None)
            .map_err(|e| {
                MatrixError::unavailable(
                    BACKEND,
                    format!("kernel compilation failed: {}", e.localizedDescription()),
                )
            })?;
        let function = library
            .newFunctionWithName(&NSString::from_str(KERNEL_NAME))
            .ok_or_else(|| {
                MatrixError::unavailable(BACKEND, format!("kernel `{}` not found", KERNEL_NAME))
            })?;
        let pipeline = device
            .newComputePipelineStateWithFunction_error(&function)
            .map_err(|e| {
                MatrixError::unavailable(
                    BACKEND,
                    format!("pipeline creation failed: {}", e.localizedDescription()),
                )
            })?;

        debug!(device = %device.name(), "metal backend ready");
        Ok(MetalBackend {
            device,
            queue,
            pipeline,
        })
    }

    /// Name of the GPU the backend runs on.
    pub fn device_name(&self) -> String {
        self.device.name().to_string()
    }

    fn upload(&self, data: &[f32]) -> Result<Buffer> {
        let ptr = NonNull::new(data.as_ptr() as *mut c_void)
            .ok_or_else(|| MatrixError::Backend("metal: null operand pointer".to_string()))?;
        // SAFETY: `ptr` is valid for `size_of_val(data)` bytes; Metal copies
        // them into the new buffer before returning.
        unsafe {
            self.device.newBufferWithBytes_length_options(
                ptr,
                size_of_val(data),
                MTLResourceOptions::StorageModeShared,
            )
        }
        .ok_or_else(|| MatrixError::Backend("metal: operand buffer allocation failed".to_string()))
    }

    /// Run the kernel on `n × n` f32 operands.
    fn run(&self, a: &[f32], b: &[f32], n: usize) -> Result<Vec<f32>> {
        let dim = u32::try_from(n)
            .map_err(|_| MatrixError::Backend(format!("metal: dimension {} exceeds u32", n)))?;

        let a_buf = self.upload(a)?;
        let b_buf = self.upload(b)?;
        let out_buf = self
            .device
            .newBufferWithLength_options(
                n * n * size_of::<f32>(),
                MTLResourceOptions::StorageModeShared,
            )
            .ok_or_else(|| {
                MatrixError::Backend("metal: product buffer allocation failed".to_string())
            })?;

        let command = self
            .queue
            .commandBuffer()
            .ok_or_else(|| MatrixError::Backend("metal: no command buffer".to_string()))?;
        let encoder = command
            .computeCommandEncoder()
            .ok_or_else(|| MatrixError::Backend("metal: no compute encoder".to_string()))?;

        let width = self.pipeline.threadExecutionWidth().max(1);
        let height = (self.pipeline.maxTotalThreadsPerThreadgroup() / width).max(1);
        let grid = MTLSize {
            width: n,
            height: n,
            depth: 1,
        };
        let group = MTLSize {
            width: width.min(n),
            height: height.min(n),
            depth: 1,
        };

        // SAFETY: the buffers outlive the command buffer, which is waited on
        // below; indices match the kernel's [[buffer(i)]] bindings and `dim`
        // is copied by setBytes.
        unsafe {
            encoder.setComputePipelineState(&self.pipeline);
            encoder.setBuffer_offset_atIndex(Some(&a_buf), 0, 0);
            encoder.setBuffer_offset_atIndex(Some(&b_buf), 0, 1);
            encoder.setBuffer_offset_atIndex(Some(&out_buf), 0, 2);
            encoder.setBytes_length_atIndex(NonNull::from(&dim).cast(), size_of::<u32>(), 3);
            encoder.dispatchThreads_threadsPerThreadgroup(grid, group);
        }
        encoder.endEncoding();
        command.commit();
        command.waitUntilCompleted();

        if let Some(err) = command.error() {
            return Err(MatrixError::Backend(format!(
                "metal: command buffer failed: {}",
                err.localizedDescription()
            )));
        }

        let ptr = out_buf.contents().cast::<f32>();
        // SAFETY: the buffer holds n*n f32 values written by the completed
        // kernel and stays alive until after the copy.
        let product = unsafe { std::slice::from_raw_parts(ptr.as_ptr(), n * n) }.to_vec();
        Ok(product)
    }
}

impl std::fmt::Debug for MetalBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetalBackend")
            .field("device", &self.device_name())
            .finish_non_exhaustive()
    }
}

impl<T: Scalar> MatMulBackend<T> for MetalBackend {
    fn name(&self) -> &str {
        BACKEND
    }

    fn matmul(&self, a: &[T], b: &[T]) -> Result<Vec<T>> {
        require_precision::<T>(BACKEND, SUPPORTED)?;
        let n = square_dimension(a, b)?;
        debug!(n, "metal matmul");

        // T is f32 here, so both conversions are exact.
        let a32: Vec<f32> = a.iter().map(|v| v.to_real() as f32).collect();
        let b32: Vec<f32> = b.iter().map(|v| v.to_real() as f32).collect();
        let product = self.run(&a32, &b32, n)?;
        Ok(product.into_iter().map(|v| T::from_real(v as f64)).collect())
    }
}
