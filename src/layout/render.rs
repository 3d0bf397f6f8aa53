use std::borrow::Cow;
use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{CueburnError, CueburnResult};
use crate::layout::font::ResolvedFont;
use crate::layout::wrap::wrap_words;
use crate::style::CaptionStyle;

/// Vertical gap between wrapped lines, in pixels.
const LINE_SPACING_PX: f64 = 10.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub struct TextBrushRgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// One rasterized caption, premultiplied RGBA8.
#[derive(Clone)]
pub struct RenderedCue {
    pub width: u32,
    pub height: u32,
    /// Premultiplied-alpha RGBA8 pixels, row-major, `width * height * 4` bytes.
    pub rgba8_premul: Vec<u8>,
}

impl std::fmt::Debug for RenderedCue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderedCue")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.rgba8_premul.len())
            .finish()
    }
}

/// Stateful caption rasterizer bound to one font.
///
/// Holds Parley shaping contexts, so it is not `Sync`; concurrent renders each
/// construct their own renderer from a shared [`ResolvedFont`].
pub struct CaptionRenderer {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    family_name: String,
    font_data: vello_cpu::peniko::FontData,
}

impl CaptionRenderer {
    pub fn new(font: &ResolvedFont) -> CueburnResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font.bytes.as_ref().clone()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| CueburnError::render("no font families registered from font bytes"))?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| CueburnError::render("registered font family has no name"))?
            .to_string();

        let font_data = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(font.bytes.as_ref().clone()),
            0,
        );

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            font_data,
        })
    }

    fn layout_line(&mut self, text: &str, size_px: f32) -> parley::Layout<TextBrushRgba8> {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(
            TextBrushRgba8::default(),
        ));
        let mut layout = builder.build(text);
        layout.break_all_lines(None);
        layout
    }

    /// Shaped (width, height) of one line of text, in pixels.
    fn measure_line(&mut self, text: &str, size_px: f32) -> (f64, f64) {
        let layout = self.layout_line(text, size_px);
        let mut w = 0.0f64;
        let mut h = 0.0f64;
        for line in layout.lines() {
            let m = line.metrics();
            w = w.max(f64::from(m.advance));
            h += f64::from(m.ascent + m.descent + m.leading);
        }
        (w, h)
    }

    /// Rasterize one cue's text into an RGBA image sized to fit.
    ///
    /// Draw order per line: shadow stamps (when enabled), outline stamps,
    /// then the fill on top. The background rectangle, if any, goes under
    /// everything. Lines wrap against `style.max_text_width` and are each
    /// centered horizontally.
    pub fn render_cue(&mut self, text: &str, style: &CaptionStyle) -> CueburnResult<RenderedCue> {
        style.validate()?;
        let size_px = style.font_size as f32;

        let lines = wrap_words(text, f64::from(style.max_text_width), |candidate| {
            self.measure_line(candidate, size_px).0
        });

        let mut shaped: Vec<(parley::Layout<TextBrushRgba8>, f64, f64)> =
            Vec::with_capacity(lines.len());
        let mut max_line_w = 0.0f64;
        let mut total_h = 0.0f64;
        for (i, line) in lines.iter().enumerate() {
            let layout = self.layout_line(line, size_px);
            let (w, h) = layout_extent(&layout);
            max_line_w = max_line_w.max(w);
            total_h += h;
            if i > 0 {
                total_h += LINE_SPACING_PX;
            }
            shaped.push((layout, w, h));
        }

        let outline = f64::from(style.outline_width);
        let shadow_dx = if style.shadow {
            f64::from(style.shadow_offset.0)
        } else {
            0.0
        };
        // Headroom so outline and shadow stamps never clip at the edges.
        let padding = outline * 2.0 + shadow_dx + 10.0;
        let bg_pad = f64::from(style.background_padding);

        let img_w = (max_line_w + 2.0 * padding + 2.0 * bg_pad).ceil().max(1.0) as u32;
        let img_h = (total_h + 2.0 * padding + 2.0 * bg_pad).ceil().max(1.0) as u32;
        let w16 = u16::try_from(img_w)
            .map_err(|_| CueburnError::render(format!("caption width {img_w} exceeds u16 range")))?;
        let h16 = u16::try_from(img_h)
            .map_err(|_| CueburnError::render(format!("caption height {img_h} exceeds u16 range")))?;

        let mut ctx = vello_cpu::RenderContext::new(w16, h16);

        if let Some([r, g, b, a]) = style.background_color {
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                bg_pad,
                bg_pad,
                f64::from(img_w) - bg_pad,
                f64::from(img_h) - bg_pad,
            ));
        }

        let ow = i64::from(style.outline_width);
        let mut text_y = padding + bg_pad;
        for (layout, line_w, line_h) in &shaped {
            let text_x = ((f64::from(img_w) - line_w) / 2.0).floor();

            if style.shadow {
                let sdx = f64::from(style.shadow_offset.0);
                let sdy = f64::from(style.shadow_offset.1);
                // The shadow carries its own outline: the full stamp grid,
                // origin included, at the shadow offset.
                for dx in -ow..=ow {
                    for dy in -ow..=ow {
                        stamp_layout(
                            &mut ctx,
                            &self.font_data,
                            layout,
                            text_x + sdx + dx as f64,
                            text_y + sdy + dy as f64,
                            style.shadow_color,
                        );
                    }
                }
            }

            let [or, og, ob] = style.outline_color;
            for dx in -ow..=ow {
                for dy in -ow..=ow {
                    if dx == 0 && dy == 0 {
                        continue;
                    }
                    stamp_layout(
                        &mut ctx,
                        &self.font_data,
                        layout,
                        text_x + dx as f64,
                        text_y + dy as f64,
                        [or, og, ob, 255],
                    );
                }
            }

            let [fr, fg, fb] = style.font_color;
            stamp_layout(
                &mut ctx,
                &self.font_data,
                layout,
                text_x,
                text_y,
                [fr, fg, fb, 255],
            );

            text_y += line_h + LINE_SPACING_PX;
        }

        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(w16, h16);
        ctx.render_to_pixmap(&mut pixmap);

        Ok(RenderedCue {
            width: img_w,
            height: img_h,
            rgba8_premul: pixmap.data_as_u8_slice().to_vec(),
        })
    }
}

fn layout_extent(layout: &parley::Layout<TextBrushRgba8>) -> (f64, f64) {
    let mut w = 0.0f64;
    let mut h = 0.0f64;
    for line in layout.lines() {
        let m = line.metrics();
        w = w.max(f64::from(m.advance));
        h += f64::from(m.ascent + m.descent + m.leading);
    }
    (w, h)
}

fn stamp_layout(
    ctx: &mut vello_cpu::RenderContext,
    font: &vello_cpu::peniko::FontData,
    layout: &parley::Layout<TextBrushRgba8>,
    x: f64,
    y: f64,
    color: [u8; 4],
) {
    ctx.set_transform(vello_cpu::kurbo::Affine::translate((x, y)));
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
        color[0], color[1], color[2], color[3],
    ));
    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            ctx.glyph_run(font)
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }
}

/// Write a rendered cue as a PNG with straight (unpremultiplied) alpha.
pub fn save_png(cue: &RenderedCue, path: &Path) -> CueburnResult<()> {
    let mut straight = cue.rgba8_premul.clone();
    unpremultiply_rgba8_in_place(&mut straight);
    let img = image::RgbaImage::from_raw(cue.width, cue.height, straight)
        .ok_or_else(|| CueburnError::render("rendered cue buffer size mismatch"))?;
    img.save(path)
        .with_context(|| format!("write caption PNG '{}'", path.display()))?;
    Ok(())
}

fn unpremultiply_rgba8_in_place(pixels: &mut [u8]) {
    for px in pixels.chunks_exact_mut(4) {
        let a = px[3] as u32;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
        } else {
            for c in &mut px[..3] {
                let v = (u32::from(*c) * 255 + a / 2) / a;
                *c = v.min(255) as u8;
            }
        }
    }
}
