use std::path::{Path, PathBuf};

use crate::shaders;

/// Errors from loading or compiling a single shader stage.
#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    #[error("failed to read {stage} shader {path}: {source}")]
    Io {
        stage: ShaderStage,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{stage} shader failed to parse: {message}")]
    Parse { stage: ShaderStage, message: String },
    #[error("{stage} shader failed validation: {message}")]
    Validation { stage: ShaderStage, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn entry_point(self) -> &'static str {
        match self {
            ShaderStage::Vertex => shaders::VERTEX_ENTRY,
            ShaderStage::Fragment => shaders::FRAGMENT_ENTRY,
        }
    }

    pub fn builtin_source(self) -> &'static str {
        match self {
            ShaderStage::Vertex => shaders::VERTEX_SHADER,
            ShaderStage::Fragment => shaders::FRAGMENT_SHADER,
        }
    }

    fn naga_stage(self) -> naga::ShaderStage {
        match self {
            ShaderStage::Vertex => naga::ShaderStage::Vertex,
            ShaderStage::Fragment => naga::ShaderStage::Fragment,
        }
    }

    fn label(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex_shader",
            ShaderStage::Fragment => "fragment_shader",
        }
    }
}

impl std::fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        })
    }
}

/// Read a stage's WGSL source from disk.
pub fn read_stage(stage: ShaderStage, path: &Path) -> Result<String, ShaderError> {
    std::fs::read_to_string(path).map_err(|source| ShaderError::Io {
        stage,
        path: path.to_path_buf(),
        source,
    })
}

/// Parse and validate one stage on its own, without a device.
///
/// The source must also declare the stage's entry point with the matching
/// stage attribute.
pub fn validate_stage(stage: ShaderStage, source: &str) -> Result<(), ShaderError> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| ShaderError::Parse {
        stage,
        message: e.emit_to_string(source),
    })?;

    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    );
    validator
        .validate(&module)
        .map_err(|e| ShaderError::Validation {
            stage,
            message: e.emit_to_string(source),
        })?;

    let entry = stage.entry_point();
    if !module
        .entry_points
        .iter()
        .any(|ep| ep.name == entry && ep.stage == stage.naga_stage())
    {
        return Err(ShaderError::Validation {
            stage,
            message: format!("no @{stage} entry point named `{entry}`"),
        });
    }
    Ok(())
}

/// Source for `stage` from `path`, or the built-in source if the file
/// can't be read or doesn't validate.
pub fn stage_source_or_builtin(stage: ShaderStage, path: &Path) -> String {
    let checked = read_stage(stage, path)
        .and_then(|source| validate_stage(stage, &source).map(|()| source));
    match checked {
        Ok(source) => source,
        Err(e) => {
            tracing::error!("{e}; using built-in {stage} shader");
            stage.builtin_source().to_owned()
        }
    }
}

/// Compile one stage inside its own validation scope.
pub fn compile_stage(
    device: &wgpu::Device,
    stage: ShaderStage,
    source: &str,
) -> Result<wgpu::ShaderModule, ShaderError> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(stage.label()),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });
    match pollster::block_on(device.pop_error_scope()) {
        None => Ok(module),
        Some(err) => Err(ShaderError::Validation {
            stage,
            message: err.to_string(),
        }),
    }
}

/// Vertex and fragment modules, each owned for the lifetime of the program.
///
/// Every stage is read and validated on its own. A stage that can't be read
/// or doesn't validate is logged and replaced by its built-in source, so the
/// pipeline can always be built.
pub struct ShaderProgram {
    vertex: wgpu::ShaderModule,
    fragment: wgpu::ShaderModule,
}

impl ShaderProgram {
    pub fn from_files(device: &wgpu::Device, vertex_path: &Path, fragment_path: &Path) -> Self {
        let vertex = Self::load_stage(device, ShaderStage::Vertex, vertex_path);
        let fragment = Self::load_stage(device, ShaderStage::Fragment, fragment_path);
        tracing::debug!(
            "shader program ready ({}, {})",
            vertex_path.display(),
            fragment_path.display()
        );
        Self { vertex, fragment }
    }

    pub fn builtin(device: &wgpu::Device) -> Self {
        Self {
            vertex: Self::compile_builtin(device, ShaderStage::Vertex),
            fragment: Self::compile_builtin(device, ShaderStage::Fragment),
        }
    }

    pub fn vertex_module(&self) -> &wgpu::ShaderModule {
        &self.vertex
    }

    pub fn fragment_module(&self) -> &wgpu::ShaderModule {
        &self.fragment
    }

    fn load_stage(device: &wgpu::Device, stage: ShaderStage, path: &Path) -> wgpu::ShaderModule {
        let source = stage_source_or_builtin(stage, path);
        match compile_stage(device, stage, &source) {
            Ok(module) => module,
            Err(e) => {
                tracing::error!("{e}; using built-in {stage} shader");
                Self::compile_builtin(device, stage)
            }
        }
    }

    fn compile_builtin(device: &wgpu::Device, stage: ShaderStage) -> wgpu::ShaderModule {
        device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(stage.label()),
            source: wgpu::ShaderSource::Wgsl(stage.builtin_source().into()),
        })
    }
}
