//! HTML 实体解码
//!
//! 题库返回的题干和选项都做了 HTML 编码（`&quot;`、`&#039;` 等），显示前需要还原

/// 解码 HTML 实体
///
/// 支持全部 HTML5 命名实体和数字实体，无法识别的实体原样保留
pub fn decode_html(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_named() {
        assert_eq!(
            decode_html("Who wrote &quot;Hamlet&quot; &amp; &quot;Macbeth&quot;?"),
            "Who wrote \"Hamlet\" & \"Macbeth\"?"
        );
    }

    #[test]
    fn test_decode_numeric() {
        assert_eq!(decode_html("It&#039;s"), "It's");
        assert_eq!(decode_html("caf&#xE9;"), "café");
    }

    #[test]
    fn test_unknown_entity_kept() {
        assert_eq!(decode_html("a &bogus; b"), "a &bogus; b");
        assert_eq!(decode_html("AT&T"), "AT&T");
    }

    #[test]
    fn test_decode_accented_and_greek() {
        assert_eq!(decode_html("&Aacute;ngel"), "Ángel");
        assert_eq!(decode_html("&Ccedil;a"), "Ça");
        assert_eq!(decode_html("&epsilon;"), "\u{3b5}");
    }

    #[test]
    fn test_decode_direction_mark() {
        assert_eq!(decode_html("Pok&eacute;mon&lrm;"), "Pokémon\u{200e}");
    }

    #[test]
    fn test_no_double_decode() {
        assert_eq!(decode_html("&amp;quot;"), "&quot;");
    }
}
