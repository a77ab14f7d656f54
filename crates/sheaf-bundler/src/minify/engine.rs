//! The minification engine. Everything here is synchronous and CPU-bound;
//! callers run it on a blocking thread or inside a worker process.

use super::BundleRequest;
use crate::enumerate::ModuleJob;
use crate::manifest::ScriptDescriptor;
use crate::{Error, Result};
use oxc_allocator::Allocator;
use oxc_codegen::{Codegen, CodegenOptions};
use oxc_minifier::{CompressOptions, MangleOptions, Minifier, MinifierOptions};
use oxc_parser::Parser;
use oxc_span::SourceType;
use std::fs;

/// Inserted between concatenated sources so a file missing its trailing
/// semicolon cannot merge into the next one.
pub const CONCAT_SEPARATOR: &str = "\n;";

/// Minify one script.
///
/// Identifiers are always mangled. `compress` additionally enables the
/// compressor. Sources are parsed as classic scripts, so top-level bindings
/// stay global and are never renamed.
pub fn minify_source(source: &str, compress: bool) -> std::result::Result<String, String> {
    let allocator = Allocator::default();
    let parsed = Parser::new(&allocator, source, SourceType::cjs()).parse();

    if let Some(error) = parsed.errors.first() {
        return Err(error.to_string());
    }
    if parsed.panicked {
        return Err("parser aborted".to_string());
    }

    let mut program = parsed.program;
    let options = MinifierOptions {
        mangle: Some(MangleOptions::default()),
        compress: compress.then(CompressOptions::smallest),
    };
    let minified = Minifier::new(options).minify(&allocator, &mut program);

    Ok(Codegen::new()
        .with_options(CodegenOptions::minify())
        .with_scoping(minified.scoping)
        .build(&program)
        .code)
}

/// Minify a module job from its source to its destination.
pub fn minify_job(job: &ModuleJob) -> Result<()> {
    let source = fs::read_to_string(&job.source_path).map_err(|e| Error::Minify {
        name: job.relative_name.clone(),
        message: e.to_string(),
    })?;

    let code = minify_source(&source, true).map_err(|message| Error::Minify {
        name: job.relative_name.clone(),
        message,
    })?;

    fs::write(&job.destination_path, code).map_err(|e| Error::Minify {
        name: job.relative_name.clone(),
        message: format!("cannot write {}: {}", job.destination_path.display(), e),
    })
}

/// Read `files` in order and join them with [`CONCAT_SEPARATOR`].
pub fn concat_sources(files: &[ScriptDescriptor]) -> Result<String> {
    let mut output = String::new();
    for (index, file) in files.iter().enumerate() {
        if index > 0 {
            output.push_str(CONCAT_SEPARATOR);
        }
        let source = fs::read_to_string(&file.source_path).map_err(|source| Error::Bundle {
            path: file.source_path.clone(),
            source,
        })?;
        output.push_str(&source);
    }
    Ok(output)
}

/// Compose a bundle: concatenate, optionally minify, write.
///
/// Bundle minification mangles but never compresses.
pub fn minify_bundle(request: &BundleRequest) -> Result<()> {
    let combined = concat_sources(&request.files)?;

    let output = if request.minify {
        minify_source(&combined, false).map_err(|message| Error::Minify {
            name: request.file_name.clone(),
            message,
        })?
    } else {
        combined
    };

    fs::write(&request.dest_path, output).map_err(|source| Error::Bundle {
        path: request.dest_path.clone(),
        source,
    })
}
