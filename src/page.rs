//! Standalone page wrapping.

/// Web font imported into every wrapped page.
pub const FONT_IMPORT_URL: &str =
    "https://fonts.googleapis.com/css2?family=Pixelify+Sans&display=swap";

/// Wrap a rendered fragment and the stylesheet bundle into a complete
/// standalone HTML page.
///
/// The fragment is embedded verbatim (it is trusted HTML produced by the
/// renderer); the stylesheet bundle lands in an inline `<style>` block,
/// preceded by the web-font import. Pure and deterministic.
pub fn wrap(fragment: &str, stylesheet: &str) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head>\n\
         <meta charset=\"UTF-8\">\n\
         <style>\n\
         @import url('{FONT_IMPORT_URL}');\n\
         body {{\n\
         \x20   font-family: 'Pixelify Sans', sans-serif;\n\
         }}\n\
         {stylesheet}\n\
         </style>\n\
         </head>\n\
         <body>\n\
         {fragment}\n\
         </body>\n\
         </html>\n"
    )
}
