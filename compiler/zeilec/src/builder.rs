//! The compile pipeline.
//!
//! [`StoryBuilder::build`] prepends the standard library unit, checks every
//! unit and, unless analysis failed, interprets the checked tree into a
//! [`StoryIr`]. Analysis errors discard the story; errors added during IR
//! generation keep it but mark it provisional. Only a story from an
//! error-free build is packed by [`StoryBuilder::build_encoded`].

use std::io::Write;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;
use zeile_codec::CodecError;
use zeile_diagnostic::emitter::{ColorMode, TerminalEmitter};
use zeile_diagnostic::{Diagnostic, HasError};
use zeile_eval::{CharacterRoster, EmptyRoster, IrGenerator, VTable};
use zeile_ir::{Locale, SourceUnit, StoryIr, UnitId};
use zeile_sema::{stdlib_unit, SemaEvaluator, SemaTables, Symbolizer};

use crate::cache::{CachedSema, CompileCache, Fingerprint};

/// Configuration for [`StoryBuilder`].
#[derive(Clone)]
pub struct BuildOptions {
    /// Generate for this locale instead of the one chosen by shebangs.
    pub locale: Option<Locale>,
    /// Discard the story when analysis reports an error.
    pub stop_on_error: bool,
    /// Extra natives; an entry replaces a standard one with the same key.
    pub natives: VTable,
    pub roster: Arc<dyn CharacterRoster + Send + Sync>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        BuildOptions {
            locale: None,
            stop_on_error: true,
            natives: VTable::new(),
            roster: Arc::new(EmptyRoster),
        }
    }
}

impl BuildOptions {
    #[must_use]
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = Some(locale);
        self
    }

    #[must_use]
    pub fn with_stop_on_error(mut self, stop_on_error: bool) -> Self {
        self.stop_on_error = stop_on_error;
        self
    }

    #[must_use]
    pub fn with_natives(mut self, natives: VTable) -> Self {
        self.natives = natives;
        self
    }

    #[must_use]
    pub fn with_roster(mut self, roster: impl CharacterRoster + Send + Sync + 'static) -> Self {
        self.roster = Arc::new(roster);
        self
    }
}

/// Why a build produced no usable story.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("semantic analysis reported {errors} error(s); no story was generated")]
    AnalysisFailed { errors: usize },
    #[error("IR generation reported {errors} error(s); the story is provisional")]
    Provisional { errors: usize },
    #[error("failed to encode story: {0}")]
    Codec(#[from] CodecError),
}

/// Outcome of one build.
#[derive(Debug)]
pub struct Build {
    units: Vec<SourceUnit>,
    /// `None` when analysis failed and the build stops on errors.
    pub story: Option<StoryIr>,
    /// Analysis diagnostics followed by generation diagnostics.
    pub diagnostics: Vec<Diagnostic>,
    /// Generation reported an error; the story may be incomplete.
    pub provisional: bool,
    /// Analysis results came from a [`CompileCache`].
    pub from_cache: bool,
}

impl Build {
    /// Every unit of the build, standard library first.
    pub fn units(&self) -> &[SourceUnit] {
        &self.units
    }

    pub fn has_error(&self) -> bool {
        self.diagnostics.has_error()
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    /// The story of an error-free build.
    pub fn into_story(self) -> Result<StoryIr, BuildError> {
        let errors = self.error_count();
        match self.story {
            Some(story) if errors == 0 => Ok(story),
            Some(_) if self.provisional => Err(BuildError::Provisional { errors }),
            _ => Err(BuildError::AnalysisFailed { errors }),
        }
    }

    /// Terminal emitter that knows the text of every unit in this build.
    pub fn terminal_emitter<W: Write>(
        &self,
        writer: W,
        mode: ColorMode,
        is_tty: bool,
    ) -> TerminalEmitter<W> {
        let mut emitter = TerminalEmitter::with_color_mode(writer, mode, is_tty);
        for (index, unit) in self.units.iter().enumerate() {
            if let Some(text) = &unit.text {
                let id = UnitId::new(u32::try_from(index).unwrap_or(u32::MAX));
                emitter = emitter.with_source(id, unit.name.clone(), text.clone());
            }
        }
        emitter
    }
}

/// Drives analysis and IR generation with fixed [`BuildOptions`].
#[derive(Clone)]
pub struct StoryBuilder {
    options: BuildOptions,
    /// Standard natives merged with the custom ones.
    vtable: VTable,
}

impl Default for StoryBuilder {
    fn default() -> Self {
        Self::new(BuildOptions::default())
    }
}

impl StoryBuilder {
    pub fn new(options: BuildOptions) -> Self {
        let mut vtable = VTable::with_stdlib();
        vtable.extend_from(&options.natives);
        StoryBuilder { options, vtable }
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    pub fn vtable(&self) -> &VTable {
        &self.vtable
    }

    /// Check and generate the user units.
    pub fn build(&self, user_units: Vec<SourceUnit>) -> Build {
        self.run(user_units, None)
    }

    /// Like [`build`](Self::build), reusing and refreshing `cache`.
    pub fn build_cached(&self, user_units: Vec<SourceUnit>, cache: &CompileCache) -> Build {
        self.run(user_units, Some(cache))
    }

    /// Build and pack the story; fails on any error diagnostic.
    pub fn build_encoded(&self, user_units: Vec<SourceUnit>) -> Result<Vec<u8>, BuildError> {
        let story = self.build(user_units).into_story()?;
        Ok(zeile_codec::encode(&story)?)
    }

    #[tracing::instrument(level = "debug", skip_all, fields(units = user_units.len()))]
    fn run(&self, user_units: Vec<SourceUnit>, cache: Option<&CompileCache>) -> Build {
        let fingerprint = cache.and_then(|_| Fingerprint::of(&user_units));

        let mut units = Vec::with_capacity(user_units.len() + 1);
        units.push(stdlib_unit());
        units.extend(user_units);

        let cached = match (cache, fingerprint) {
            (Some(cache), Some(fingerprint)) => cache.lookup(fingerprint),
            _ => None,
        };
        let from_cache = cached.is_some();
        let (tables, mut diagnostics) = match cached {
            Some(entry) => {
                debug!(?fingerprint, "reusing cached analysis");
                (entry.tables, entry.diagnostics)
            }
            None => {
                let (tables, diagnostics) = analyze(&units);
                if let (Some(cache), Some(fingerprint)) = (cache, fingerprint) {
                    cache.store(CachedSema {
                        fingerprint,
                        symbols: Symbolizer::new(&tables).symbolize_all(),
                        tables: tables.clone(),
                        diagnostics: diagnostics.clone(),
                    });
                }
                (tables, diagnostics)
            }
        };

        if self.options.stop_on_error && diagnostics.has_error() {
            debug!(diagnostics = diagnostics.len(), "analysis failed; story discarded");
            return Build {
                units,
                story: None,
                diagnostics,
                provisional: false,
                from_cache,
            };
        }

        let mut generator = IrGenerator::new(&units, &tables, &self.vtable, &*self.options.roster);
        if let Some(locale) = self.options.locale {
            generator = generator.with_locale(locale);
        }
        let (story, generated) = generator.generate();
        let provisional = generated.has_error();
        diagnostics.extend(generated);

        debug!(
            actions = story.actions().len(),
            diagnostics = diagnostics.len(),
            provisional,
            "build finished"
        );
        Build {
            units,
            story: Some(story),
            diagnostics,
            provisional,
            from_cache,
        }
    }
}

fn analyze(units: &[SourceUnit]) -> (SemaTables, Vec<Diagnostic>) {
    let mut evaluator = SemaEvaluator::new(units);
    let diagnostics = evaluator.perform_sema();
    (evaluator.into_tables(), diagnostics)
}
