// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Vector PDF output. Charts are drawn to an in-memory SVG document which is
//! then converted, text included, into a single page PDF.

use svg2pdf::usvg::{fontdb, Options, PostProcessingSteps, Tree, TreeParsing, TreePostProc};

use std::error::Error;

/// Font database holding only the embedded font, which also serves the
/// generic `sans-serif` family the charts ask for.
fn fonts() -> Result<fontdb::Database, Box<dyn Error>> {
    let mut fonts = fontdb::Database::new();
    fonts.load_font_data(dejavu::sans_mono::regular().to_vec());
    let family = fonts
        .faces()
        .next()
        .and_then(|face| face.families.first())
        .map(|(name, _)| name.clone())
        .ok_or("failed to load embedded font")?;
    fonts.set_sans_serif_family(family);
    Ok(fonts)
}

/// Convert an SVG document into PDF bytes. One SVG pixel becomes one point.
pub(crate) fn from_svg(svg: &str) -> Result<Vec<u8>, Box<dyn Error>> {
    let mut tree = Tree::from_str(svg, &Options::default())?;
    tree.postprocess(PostProcessingSteps::default(), &fonts()?);
    Ok(svg2pdf::convert_tree(&tree, svg2pdf::Options::default()))
}
