//! The extent coverage test: is a feature fully checked yet?

use cairn_core::Envelope;

/// Decide whether a feature extent has been fully covered by the
/// processed area.
///
/// `tile_envelope` is the area guaranteed fully processed as of the most
/// recently completed tile; `run_envelope`, when known, bounds the whole
/// verification run.
///
/// A feature is fully checked when every tile that could contain a
/// relevant neighbor has been processed:
///
/// 1. Its extent lies entirely within `tile_envelope`, or
/// 2. the part of its extent inside `run_envelope` lies entirely within
///    `tile_envelope` — whatever sticks out of the processed area also
///    sticks out of the area that will ever be verified, so no future
///    tile can change the judgment. An extent wholly outside the run
///    envelope clips to nothing and resolves immediately.
///
/// The decision is monotone in the tile envelope: once `true` for some
/// processed area, it stays `true` for any larger one. Tile coverage
/// only grows, so a resolved feature can never become unresolved.
pub fn is_fully_checked(
    extent: &Envelope,
    tile_envelope: &Envelope,
    run_envelope: Option<&Envelope>,
) -> bool {
    if tile_envelope.contains(extent) {
        return true;
    }
    match run_envelope {
        Some(run) => match extent.intersection(run) {
            Some(clipped) => tile_envelope.contains(&clipped),
            None => true,
        },
        None => false,
    }
}
