//! Sequence playback demo.
//!
//! Builds a density sequence plus a static temperature volume, drives the
//! container with a `SequencePlayer`, and prints what a renderer would pull on
//! every frame change.
//!
//! Run with: RUST_LOG=debug cargo run --example sequence_playback

use std::cell::RefCell;
use std::rc::Rc;

use vdb_asset::*;

fn main() -> Result<()> {
    env_logger::init();

    // A plume that grows and drifts upward over 12 frames.
    let frames = (0..12)
        .map(|i| {
            RenderInfo::new(
                VdbClass::FogVolume,
                IVec3::new(-8, i, -8),
                UVec3::new(16, 16 + 2 * i as u32, 16),
            )
        })
        .collect();
    let options = SequenceOptions::from_json(r#"{ "frame_policy": "Wrap" }"#)?;
    let density =
        VolumeHandle::new(VolumeSequence::with_options("plume.density", frames, &options)?);
    let temperature = VolumeHandle::new(StaticVolume::new(
        "plume.temperature",
        RenderInfo::new(VdbClass::FogVolume, IVec3::splat(-8), UVec3::splat(16)),
    ));

    let mut container = AssetContainer::new();
    container.set_volumes(Some(density.clone()), Some(temperature.clone()));
    println!(
        "{} volume(s), class {:?}, size {}, offset {}, {} frame(s)",
        container.num_volumes(),
        container.vdb_class()?,
        container.volume_size(),
        container.volume_offset(),
        container.frame_count()
    );

    container.subscribe_vdb_changed(|frame| println!("[ui] frame -> {frame}"));

    let draws = Rc::new(RefCell::new(0u32));
    let sink = Rc::clone(&draws);
    container.subscribe_frame_changed(move |container, frame| {
        for volume in container.volumes() {
            match container.resolve_render_info(volume) {
                Ok(info) => {
                    let role = container.channel_role(volume).map(|r| format!("{r:?}"));
                    let uniforms = info.to_uniforms();
                    println!(
                        "[render] frame {frame}: {} ({}) box min {:?} size {:?}",
                        volume.name(),
                        role.unwrap_or_default(),
                        uniforms.index_min,
                        uniforms.index_size
                    );
                    *sink.borrow_mut() += 1;
                }
                Err(err) => println!("[render] skipping {}: {err}", volume.name()),
            }
        }
    });

    let playback = PlaybackOptions::from_json(r#"{ "frame_rate": 12.0, "looping": false }"#)?;
    let mut player = SequencePlayer::new(playback);
    let dt = 1.0 / 30.0;
    while player.is_playing() {
        player.tick(dt, &mut container);
    }

    // Scrub past the end; the density sequence wraps, the container keeps the raw index.
    container.advance_to_frame(15);
    println!(
        "scrubbed to {}, density resolves to box min {}",
        container.current_frame_index(),
        container.resolve_render_info(&density)?.index_min
    );

    println!("{} render info lookups", draws.borrow());
    Ok(())
}
