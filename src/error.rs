// Copyright (c) 2026 James O. Schreckengast
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

use thiserror::Error;

/// Failures of the window host. The particle field itself cannot fail.
#[derive(Debug, Error)]
pub enum BackdropError {
    #[error("failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("GPU surface error: {0}")]
    Gpu(#[from] pixels::Error),

    #[error("GPU surface resize failed: {0}")]
    GpuResize(#[from] pixels::TextureError),

    #[error("CPU surface error: {0}")]
    Cpu(String),

    #[error("surface size {width}x{height} is empty")]
    EmptySurface { width: u32, height: u32 },
}

// softbuffer's platform errors are not `Send`, keep only the message.
impl From<softbuffer::SoftBufferError> for BackdropError {
    fn from(e: softbuffer::SoftBufferError) -> Self {
        BackdropError::Cpu(e.to_string())
    }
}

pub type BackdropResult<T> = Result<T, BackdropError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_surface_message_names_size() {
        let err = BackdropError::EmptySurface {
            width: 0,
            height: 720,
        };
        assert_eq!(err.to_string(), "surface size 0x720 is empty");
    }
}
