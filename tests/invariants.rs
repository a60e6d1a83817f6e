//! Contract Invariant Tests
//!
//! These tests verify the non-negotiable guarantees.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use quoteart_core::{
    artwork_digest, generate,
    params::{Hsl, TextTone, VisualParameters},
    samples::SAMPLE_QUOTES,
    scene::{GeneratedArtwork, LayerKind},
    text::{text_units, truncate_quote},
    validation::{check_well_formed, Validator},
    ArtworkPipeline, GenerateRequest, HashDigest,
};

const FIXTURE_QUOTE: &str = "Dream it. Wish it. Do it.";
const FIXTURE_AUTHOR: &str = "Unknown";

fn random_text(rng: &mut StdRng, max_len: usize) -> String {
    let len = rng.gen_range(0..=max_len);
    (0..len).map(|_| rng.gen::<char>()).collect()
}

#[test]
fn invariant_generation_is_deterministic() {
    for sample in SAMPLE_QUOTES {
        assert_eq!(generate(sample.text, sample.author), generate(sample.text, sample.author));
    }
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..50 {
        let text = random_text(&mut rng, 200);
        let label = random_text(&mut rng, 20);
        assert_eq!(generate(&text, &label), generate(&text, &label));
    }
}

#[test]
fn invariant_samples_never_collide() {
    let params: Vec<VisualParameters> = SAMPLE_QUOTES
        .iter()
        .map(|s| VisualParameters::extract(&artwork_digest(s.text, s.author)))
        .collect();

    for (i, a) in params.iter().enumerate() {
        for b in &params[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

#[test]
fn invariant_single_character_change_changes_parameters() {
    for sample in SAMPLE_QUOTES {
        let base = VisualParameters::extract(&artwork_digest(sample.text, sample.author));
        let tweaked_label = format!("{}.", sample.author);
        let other = VisualParameters::extract(&artwork_digest(sample.text, &tweaked_label));
        assert_ne!(base, other, "{}", sample.text);
    }
}

#[test]
fn invariant_parameter_ranges_hold() {
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for _ in 0..10_000 {
        let input = random_text(&mut rng, 500);
        let p = VisualParameters::extract(&quoteart_core::hash(&input));

        for hue in [p.primary_hue, p.secondary_hue, p.tertiary_hue, p.rotation, p.secondary_rotation] {
            assert!(hue < 360);
        }
        for color in [
            p.bg_color1, p.bg_color2, p.bg_color3,
            p.accent_color1, p.accent_color2, p.accent_color3, p.text_shadow_color,
        ] {
            assert!(color.hue < 360);
            assert!(color.saturation <= 100 && color.lightness <= 100);
        }
        assert!(p.pattern_type < 8);
        assert!(p.texture_type < 4);
        assert!((2..=7).contains(&p.geometric_complexity));
        assert!((5..=16).contains(&p.shape_count));
        assert!(p.shape_variety < 5);
        assert!((0.7..1.3).contains(&p.scale));
        assert!((-15..=14).contains(&p.skew));
        assert!((4..=11).contains(&p.animation_duration));
        assert!([0.0, 0.5, 1.0].contains(&p.animation_delay));
        assert!((0.2..0.5).contains(&p.pulse_intensity));
        assert!((0.1..0.3).contains(&p.noise_intensity));
        assert!((1..=4).contains(&p.blur_radius));
        assert!((0.3..0.7).contains(&p.glow_intensity));
        assert!((3..=6).contains(&p.depth_layers));
        assert!((5..=19).contains(&p.parallax_offset));
        assert!((1..=4).contains(&p.brush_stroke_width));
        assert!((0.0..1.0).contains(&p.organic_flow));
        assert!(p.symmetry_level < 3);
    }
}

#[test]
fn invariant_truncation_law() {
    let mut rng = StdRng::seed_from_u64(99);
    let words = ["a", "dream", "is", "wish", "courage", "supercalifragilistic", "x", "😀", "✨🌙", "日本"];

    for _ in 0..500 {
        let count = rng.gen_range(1..60);
        let text = (0..count)
            .map(|_| words[rng.gen_range(0..words.len())])
            .collect::<Vec<_>>()
            .join(" ");
        let shown = truncate_quote(&text);

        if text_units(&text) <= 100 {
            assert_eq!(shown, text);
        } else {
            assert!(text_units(&shown) <= 100);
            let body = shown.strip_suffix("...").expect("ellipsis");
            assert!(text.starts_with(body));
            // cut falls on a word boundary
            if !body.is_empty() {
                assert_eq!(text.as_bytes()[body.len()], b' ');
            }
        }
    }
}

#[test]
fn invariant_truncated_quote_is_rendered() {
    let long = "Success is not final, failure is not fatal: it is the courage to continue that counts, always and forever.";
    assert!(long.chars().count() > 100);
    let svg = generate(long, "Winston Churchill");
    assert!(svg.contains(&truncate_quote(long)));
    assert!(!svg.contains("always and forever."));
}

#[test]
fn invariant_organic_layer_gated() {
    let mut seen = [false, false];
    for sample in SAMPLE_QUOTES {
        let artwork = GeneratedArtwork::generate(sample.text, sample.author);
        let gate = artwork.params().organic_flow > 0.3;
        let present = artwork.scene().layer(LayerKind::OrganicArt).is_some();
        assert_eq!(gate, present, "{}", sample.text);
        assert_eq!(gate, artwork.to_svg().contains("<!-- organic-art -->"));
        seen[gate as usize] = true;
    }
    // the samples exercise both sides of the gate
    assert_eq!(seen, [true, true]);
}

#[test]
fn invariant_empty_input_well_defined() {
    let artwork = GeneratedArtwork::generate("", "");
    assert_eq!(*artwork.digest(), HashDigest::default());
    assert_eq!((artwork.width(), artwork.height()), (500, 500));
    for layer in artwork.scene().layers() {
        assert!(!layer.markup.trim().is_empty(), "{:?} empty", layer.kind);
    }
    assert!(Validator::new().validate(&artwork).valid);

    let svg = artwork.to_svg();
    assert_eq!(check_well_formed(&svg), Ok(()));
    assert!(svg.starts_with("<svg width=\"500\" height=\"500\""));
    assert!(svg.contains("— </text>"));
}

#[test]
fn invariant_hostile_text_is_well_formed() {
    for (quote, author) in [
        ("</svg><script>alert(1)</script>", "<b>bold"),
        ("a > b && c < d", "\"Quoted\" & 'single'"),
        ("<![CDATA[ x ]]> <!-- y -->", "</text>"),
    ] {
        let svg = generate(quote, author);
        assert_eq!(check_well_formed(&svg), Ok(()), "{quote}");
    }
}

#[test]
fn invariant_reference_vector() {
    let digest = artwork_digest(FIXTURE_QUOTE, FIXTURE_AUTHOR);
    assert_eq!(
        digest,
        HashDigest { primary: 1_190_883_424, secondary: 941_886_488, combined: 248_996_936 }
    );

    let p = VisualParameters::extract(&digest);
    assert_eq!(p.primary_hue, 184);
    assert_eq!(p.secondary_hue, 312);
    assert_eq!(p.tertiary_hue, 120);
    assert_eq!(p.bg_color1, Hsl::new(184, 64, 19));
    assert_eq!(p.bg_color2, Hsl::new(244, 38, 33));
    assert_eq!(p.bg_color3, Hsl::new(4, 46, 46));
    assert_eq!(p.accent_color1, Hsl::new(214, 74, 79));
    assert_eq!(p.accent_color2, Hsl::new(218, 68, 53));
    assert_eq!(p.accent_color3, Hsl::new(206, 96, 81));
    assert_eq!(p.text_color, TextTone::Snow);
    assert_eq!(p.text_shadow_color, Hsl::new(184, 50, 10));
    assert_eq!(p.pattern_type, 0);
    assert_eq!(p.geometric_complexity, 4);
    assert_eq!(p.shape_count, 9);
    assert_eq!(p.shape_variety, 3);
    assert_eq!(p.rotation, 184);
    assert_eq!(p.secondary_rotation, 128);
    assert!((p.scale - 0.74).abs() < 1e-12);
    assert_eq!(p.skew, -7);
    assert_eq!(p.animation_duration, 4);
    assert_eq!(p.animation_delay, 1.0);
    assert!((p.pulse_intensity - 0.46).abs() < 1e-12);
    assert!((p.noise_intensity - 0.14).abs() < 1e-12);
    assert_eq!(p.blur_radius, 1);
    assert!((p.glow_intensity - 0.46).abs() < 1e-12);
    assert_eq!(p.texture_type, 0);
    assert_eq!(p.depth_layers, 3);
    assert_eq!(p.parallax_offset, 13);
    assert_eq!(p.brush_stroke_width, 1);
    assert!((p.organic_flow - 0.88).abs() < 1e-12);
    assert_eq!(p.symmetry_level, 2);

    let svg = generate(FIXTURE_QUOTE, FIXTURE_AUTHOR);
    assert!(svg.contains("stop-color:hsl(184, 64%, 19%)"));
    assert!(svg.contains("fill=\"url(#paperTexture)\""));
    assert!(svg.contains("transform=\"rotate(184 250 250)\""));
    assert!(svg.contains("font-size: 20px"));
    assert!(svg.contains("— Unknown</text>"));
}

#[test]
fn invariant_compile_validates_and_records() {
    let pipeline = ArtworkPipeline::default();
    let request = GenerateRequest::new(FIXTURE_QUOTE, FIXTURE_AUTHOR);

    let first = pipeline.compile(&request).unwrap();
    let second = pipeline.compile(&request).unwrap();

    assert!(first.validation.valid);
    assert_eq!(first.svg, generate(FIXTURE_QUOTE, FIXTURE_AUTHOR));
    // Job hash and content hash identify the work, ids do not.
    assert_eq!(first.manifest.job_hash, second.manifest.job_hash);
    assert_eq!(first.manifest.content_hash, second.manifest.content_hash);
    assert_ne!(first.manifest.id, second.manifest.id);
    assert!(!first.manifest.manifest_hash.is_empty());

    assert!(pipeline.verify(&first.manifest).unwrap());
}

#[test]
fn invariant_tampered_manifest_fails_verification() {
    let pipeline = ArtworkPipeline::default();
    let mut compiled = pipeline.compile(&GenerateRequest::new("q", "a")).unwrap();
    compiled.manifest.content_hash = "0".repeat(64);
    assert!(!pipeline.verify(&compiled.manifest).unwrap());
}

#[test]
fn invariant_manifest_survives_json() {
    let pipeline = ArtworkPipeline::default();
    let compiled = pipeline.compile(&GenerateRequest::new("Dream bigger. Do bigger.", "Unknown")).unwrap();
    let json = serde_json::to_string(&compiled.manifest).unwrap();
    let back: quoteart_core::ArtworkManifest = serde_json::from_str(&json).unwrap();
    assert_eq!(back.digest, compiled.manifest.digest);
    assert_eq!(back.parameters.pattern_type, compiled.manifest.parameters.pattern_type);
    assert!(pipeline.verify(&back).unwrap());
}

#[test]
fn invariant_non_string_payload_rejected() {
    for payload in [
        r#"{"quote": null, "author": "a"}"#,
        r#"{"quote": "q", "author": ["a"]}"#,
        r#"{"quote": true, "author": "a"}"#,
    ] {
        let err = GenerateRequest::from_json(payload).unwrap_err();
        assert!(err.to_string().starts_with("Invalid input"), "{payload}");
    }
}

#[test]
fn invariant_generation_is_thread_safe() {
    let expected = generate(FIXTURE_QUOTE, FIXTURE_AUTHOR);
    let handles: Vec<_> = (0..8)
        .map(|_| std::thread::spawn(|| generate(FIXTURE_QUOTE, FIXTURE_AUTHOR)))
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

#[cfg(feature = "test-hooks")]
#[test]
fn invariant_compile_calls_validate() {
    use quoteart_core::pipeline::{get_validation_call_count, reset_validation_call_count};

    reset_validation_call_count();
    ArtworkPipeline::default()
        .compile(&GenerateRequest::new(FIXTURE_QUOTE, FIXTURE_AUTHOR))
        .unwrap();
    assert!(get_validation_call_count() >= 1);
}
