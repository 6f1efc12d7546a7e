//! End-to-end generation: fetch, parse, synthesize, verify, render.
//!
//! A schema document yields one target (its root). A protocol yields one
//! target per record carrying a `version` property. Each target either
//! produces an [`Artifact`] or is recorded as failed; a failed target never
//! stops the others.

use crate::collab::{IdlCompiler, SchemaSource};
use crate::error::PipelineError;
use avrosynth_schema::{SchemaGraph, SchemaRef, parse_protocol, parse_schema};
use avrosynth_synth::{SynthConfig, SynthError, Synthesizer, verify};
use std::fmt;
use std::path::Path;

/// Kind of input document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputKind {
    /// Interface definition language, compiled to a protocol first.
    Idl,
    /// Protocol JSON.
    Protocol,
    /// A single schema.
    Schema,
}

impl InputKind {
    /// Detects the kind from the location's extension: `.avdl` is IDL,
    /// `.avpr` a protocol, anything else a schema. The query and fragment of
    /// a URL are ignored.
    #[must_use]
    pub fn detect(location: &str) -> Self {
        let path = if location.contains("://") {
            location
                .split(['?', '#'])
                .next()
                .unwrap_or(location)
        } else {
            location
        };
        let extension = Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("avdl") => Self::Idl,
            Some("avpr") => Self::Protocol,
            _ => Self::Schema,
        }
    }
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idl => "idl",
            Self::Protocol => "protocol",
            Self::Schema => "schema",
        })
    }
}

/// A verified (schema, example) pair ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Namespace of the target.
    pub namespace: Option<String>,
    /// Simple name of the target.
    pub name: String,
    /// Standalone schema document, pretty-printed.
    pub schema_text: String,
    /// Example instance, pretty-printed.
    pub example_text: String,
    /// Size of the example's binary encoding.
    pub encoded_len: usize,
}

impl Artifact {
    /// Namespace-qualified target name.
    #[must_use]
    pub fn fullname(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{ns}.{}", self.name),
            None => self.name.clone(),
        }
    }

    /// Base file name: `<namespace>.<name>`, or the bare name.
    #[must_use]
    pub fn file_stem(&self) -> String {
        self.fullname()
    }
}

/// Result of one target.
#[derive(Debug)]
pub enum TargetOutcome {
    /// The example was synthesized and verified.
    Generated(Artifact),
    /// No valid example could be produced.
    Failed {
        /// Target fullname.
        fullname: String,
        /// Reason.
        error: SynthError,
    },
}

impl TargetOutcome {
    /// Returns the artifact of a generated target.
    #[must_use]
    pub fn artifact(&self) -> Option<&Artifact> {
        match self {
            Self::Generated(artifact) => Some(artifact),
            Self::Failed { .. } => None,
        }
    }

    /// Returns the target fullname.
    #[must_use]
    pub fn fullname(&self) -> String {
        match self {
            Self::Generated(artifact) => artifact.fullname(),
            Self::Failed { fullname, .. } => fullname.clone(),
        }
    }
}

/// Summary of a pipeline run.
#[derive(Debug)]
pub struct Report {
    /// Input location.
    pub location: String,
    /// Detected input kind.
    pub kind: InputKind,
    /// Per-target outcomes in document order.
    pub outcomes: Vec<TargetOutcome>,
}

impl Report {
    /// Iterates over generated artifacts.
    pub fn artifacts(&self) -> impl Iterator<Item = &Artifact> {
        self.outcomes.iter().filter_map(TargetOutcome::artifact)
    }

    /// Iterates over failed targets.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &SynthError)> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            TargetOutcome::Failed { fullname, error } => Some((fullname.as_str(), error)),
            TargetOutcome::Generated(_) => None,
        })
    }

    /// Number of generated artifacts.
    #[must_use]
    pub fn generated_count(&self) -> usize {
        self.artifacts().count()
    }

    /// Number of failed targets.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.failures().count()
    }
}

/// Generates one outcome per versioned record of a protocol document.
///
/// # Errors
/// Returns `PipelineError::Parse` if the protocol is invalid.
pub fn generate_from_protocol(
    text: &str,
    config: &SynthConfig,
) -> Result<Vec<TargetOutcome>, PipelineError> {
    let protocol = parse_protocol(text)?;
    let targets = protocol.targets();
    tracing::debug!(
        "protocol {} declares {} types, {} targets",
        protocol.name.as_deref().unwrap_or("<anonymous>"),
        protocol.types().len(),
        targets.len()
    );
    targets
        .into_iter()
        .map(|target| {
            generate_target(
                protocol.graph(),
                target.schema,
                target.namespace,
                target.name,
                config,
            )
        })
        .collect()
}

/// Generates the single outcome of a schema document.
///
/// The target is named after the root type: its fullname when named, the
/// type tag otherwise.
///
/// # Errors
/// Returns `PipelineError::Parse` if the schema is invalid.
pub fn generate_from_schema(
    text: &str,
    config: &SynthConfig,
) -> Result<Vec<TargetOutcome>, PipelineError> {
    let schema = parse_schema(text)?;
    let root = schema.root_node();
    let (namespace, name) = match root.name() {
        Some(name) => (name.namespace.clone(), name.name.clone()),
        None => (None, root.type_name().to_string()),
    };
    let outcome = generate_target(schema.graph(), schema.root(), namespace, name, config)?;
    Ok(vec![outcome])
}

fn generate_target(
    graph: &SchemaGraph,
    schema: SchemaRef,
    namespace: Option<String>,
    name: String,
    config: &SynthConfig,
) -> Result<TargetOutcome, PipelineError> {
    let fullname = match &namespace {
        Some(ns) => format!("{ns}.{name}"),
        None => name.clone(),
    };

    let verified = Synthesizer::new(graph, config.clone())
        .synthesize(schema)
        .and_then(|synthesis| {
            let encoded = verify(graph, schema, &synthesis.value)?;
            Ok((synthesis, encoded.len()))
        });

    match verified {
        Ok((synthesis, encoded_len)) => {
            for cut in &synthesis.cuts {
                tracing::debug!(
                    "{}: recursion into {} cut after {}",
                    fullname,
                    cut.fullname,
                    cut.chain.join(" -> ")
                );
            }
            let artifact = Artifact {
                namespace,
                name,
                schema_text: serde_json::to_string_pretty(&graph.to_json(schema))?,
                example_text: serde_json::to_string_pretty(&synthesis.value.to_json())?,
                encoded_len,
            };
            tracing::info!("Generated {} ({} bytes encoded)", fullname, encoded_len);
            Ok(TargetOutcome::Generated(artifact))
        }
        Err(error) => {
            tracing::warn!("Failed to generate {}: {}", fullname, error);
            Ok(TargetOutcome::Failed { fullname, error })
        }
    }
}

/// Runs locations through retrieval, optional IDL compilation and
/// generation.
///
/// # Example
/// ```no_run
/// use avrosynth::prelude::*;
///
/// let pipeline = Pipeline::new(FileSource, NoIdlCompiler).config(SynthConfig::default());
/// let report = pipeline.run("schemas/user.avsc")?;
/// for artifact in report.artifacts() {
///     println!("{}: {}", artifact.file_stem(), artifact.example_text);
/// }
/// # Ok::<(), PipelineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Pipeline<S, C> {
    source: S,
    compiler: C,
    config: SynthConfig,
}

impl<S: SchemaSource, C: IdlCompiler> Pipeline<S, C> {
    /// Creates a pipeline with the default synthesis configuration.
    #[must_use]
    pub fn new(source: S, compiler: C) -> Self {
        Self {
            source,
            compiler,
            config: SynthConfig::default(),
        }
    }

    /// Sets the synthesis configuration.
    #[must_use]
    pub fn config(mut self, config: SynthConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the synthesis configuration.
    #[must_use]
    pub fn synth_config(&self) -> &SynthConfig {
        &self.config
    }

    /// Processes one location.
    ///
    /// # Errors
    /// Returns `PipelineError` if the document cannot be retrieved, compiled
    /// or parsed. Per-target failures are reported in the [`Report`].
    pub fn run(&self, location: &str) -> Result<Report, PipelineError> {
        let kind = InputKind::detect(location);
        tracing::info!("Processing {} as {}", location, kind);

        let text = self.source.fetch(location)?;
        let outcomes = match kind {
            InputKind::Idl => {
                let protocol = self.compiler.compile(&text)?;
                generate_from_protocol(&protocol, &self.config)?
            }
            InputKind::Protocol => generate_from_protocol(&text, &self.config)?,
            InputKind::Schema => generate_from_schema(&text, &self.config)?,
        };

        let report = Report {
            location: location.to_string(),
            kind,
            outcomes,
        };
        tracing::info!(
            "{}: {} generated, {} failed",
            location,
            report.generated_count(),
            report.failed_count()
        );
        Ok(report)
    }
}
