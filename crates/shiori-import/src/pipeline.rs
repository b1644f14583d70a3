//! One import run: parse, window, reconcile, normalize, commit.

use shiori_clippings::{ParseOptions, ParseOutput, after_watermark, highlights_only, read_clippings};
use shiori_config::Config;
use shiori_config::anki::AnkiConfig;
use shiori_core::error::{ImportError, Result};
use shiori_core::notes::{NoteLayout, NoteStore};
use shiori_core::progress::{NullProgress, ProgressGuard, ProgressSink};
use shiori_core::store::{LookupSource, WatermarkStore};
use shiori_core::{Clipping, Watermark};
use shiori_lang_japanese::NormalizerContext;
use shiori_vocab::cutoff_millis;

use crate::assembler::{NoteAssembler, NoteQueue};
use crate::matcher::reconcile;
use crate::report::ImportReport;

/// Everything a run talks to besides its configuration
pub struct Collaborators<'a> {
    pub notes: &'a dyn NoteStore,
    pub lookups: &'a dyn LookupSource,
    pub normalizer: &'a mut NormalizerContext,
    pub watermark: &'a mut dyn WatermarkStore,
    pub progress: &'a mut dyn ProgressSink,
}

/// Check the note type once, before any clipping is read
pub async fn resolve_layout(notes: &dyn NoteStore, anki: &AnkiConfig) -> Result<NoteLayout> {
    let field_names = notes
        .model_field_names(&anki.model)
        .await
        .map_err(ImportError::NoteStore)?
        .ok_or_else(|| ImportError::ModelNotFound(anki.model.clone()))?;

    NoteLayout::resolve(&anki.model, field_names, |role| anki.fields.field_for(role))
}

/// Full run against the configured clippings file
pub async fn run(config: &Config, collaborators: Collaborators<'_>) -> Result<ImportReport> {
    let layout = resolve_layout(collaborators.notes, &config.anki).await?;

    let options = ParseOptions {
        benign_markers: config.import.benign_markers.clone(),
    };
    let parsed = read_clippings(&config.reader.clippings_path(), &options)?;

    import(&layout, parsed, config, collaborators).await
}

/// Import already-parsed clippings
pub async fn import(
    layout: &NoteLayout,
    parsed: ParseOutput,
    config: &Config,
    collaborators: Collaborators<'_>,
) -> Result<ImportReport> {
    let Collaborators {
        notes,
        lookups,
        normalizer,
        watermark: watermark_store,
        progress,
    } = collaborators;
    let diagnostic = config.import.is_diagnostic();

    let mut null_progress = NullProgress;
    let sink: &mut dyn ProgressSink = if diagnostic {
        &mut null_progress
    } else {
        progress
    };
    let mut progress = ProgressGuard::new(sink);

    let marker = &config.import.highlight_marker;
    let marked = parsed.clippings.iter().filter(|c| c.kind_contains(marker)).count();
    let highlights = highlights_only(&parsed.clippings, marker);
    let watermark = watermark_store.load()?;
    let clippings_to_add = after_watermark(&highlights, watermark);

    let mut report = ImportReport {
        old_highlights: highlights.len() - clippings_to_add.len(),
        empty_highlights: marked - highlights.len(),
        non_highlights: parsed.clippings.len() - marked,
        bad_clippings: parsed.bad_clippings,
        ..ImportReport::default()
    };

    tracing::info!(
        "{} clippings, {} highlights, {} new since {}",
        parsed.clippings.len(),
        highlights.len(),
        clippings_to_add.len(),
        watermark.map_or_else(|| "the beginning".to_string(), |w| w.to_iso())
    );

    if clippings_to_add.is_empty() {
        return Ok(report);
    }

    let clock = config.device_clock();
    let lookups = lookups.lookups_after(cutoff_millis(watermark, clock))?;

    let assembler = NoteAssembler::new(layout, &config.anki);
    let mut queue = NoteQueue::new();

    // Newest first, against the newest-first lookups
    for matched in reconcile(clippings_to_add.iter().rev(), &lookups, clock) {
        progress.tick(&matched.clipping.content);

        let Some(lookup) = matched.lookup else {
            tracing::warn!("No lookup matches {:?}", matched.clipping.content);
            report.unmatched.push(matched.clipping.to_block());
            continue;
        };

        let normalized = normalizer.normalize(assembler.word_input(matched.clipping, lookup))?;
        queue.push(assembler.assemble(matched.clipping, lookup, normalized.word));
    }

    report.duplicates = queue.duplicates();
    for note in queue.into_commit_order() {
        if config.import.dry_run {
            tracing::info!(deck = %note.deck, tags = ?note.tags, "Dry run note: {:?}", note.fields);
        } else {
            let created = notes
                .add_note(layout.model(), &note.fields, &note.tags)
                .await
                .map_err(ImportError::NoteStore)?;
            notes
                .change_deck(&created.card_ids, &note.deck)
                .await
                .map_err(ImportError::NoteStore)?;
            tracing::debug!("Note {} for {:?} in {}", created.note_id, note.word, note.deck);
        }
        report.imported += 1;
    }
    report.fallback = normalizer.stats().fallback;

    if diagnostic {
        tracing::info!("Diagnostic run, watermark left unchanged");
    } else if let Some(newest) = clippings_to_add.iter().filter_map(Clipping::added_at).max() {
        let newest = Watermark::new(newest);
        watermark_store.store(newest)?;
        report.watermark = Some(newest);
    }

    Ok(report)
}
