//! Static style catalog: the selectable options per category, each with a
//! stable id, a display label, and the natural-language fragment the prompt
//! compiler inserts into the final instruction.
//!
//! The tables are read-only configuration defined at process start. Consumers
//! select options by id and hold `&'static` references to the entries.

/// A selectable option in one of the style categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleOption {
    pub id: &'static str,
    pub label: &'static str,
    pub prompt: &'static str,
}

/// Hair colors additionally carry an English display name and a hex swatch
/// for presentation layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HairColor {
    pub id: &'static str,
    pub name: &'static str,
    pub label: &'static str,
    pub swatch: &'static str,
    pub prompt: &'static str,
}

/// The clothing id that switches the compiler into ancient-theme mode.
pub const ANCIENT_CLOTHING_ID: &str = "ancient";

pub const HAIR_COLORS: &[HairColor] = &[
    HairColor { id: "silver", name: "Silver White", label: "银白", swatch: "#E5E7EB", prompt: "silvery-white" },
    HairColor { id: "black", name: "Natural Black", label: "黑色", swatch: "#111827", prompt: "deep natural silk-black" },
    HairColor { id: "grey", name: "Charcoal Grey", label: "灰色", swatch: "#6B7280", prompt: "sophisticated charcoal grey" },
    HairColor { id: "golden", name: "Golden Blonde", label: "金黄", swatch: "#FACC15", prompt: "shimmering golden blonde" },
    HairColor { id: "honey", name: "Honey Yellow", label: "蜜糖黄", swatch: "#FDE047", prompt: "warm trendy honey yellow" },
    HairColor { id: "amber", name: "Amber Yellow", label: "琥珀黄", swatch: "#FB923C", prompt: "rich amber yellow" },
    HairColor { id: "pearl", name: "Pearl White", label: "珍珠白", swatch: "#F9FAFB", prompt: "luminous pearl-white" },
    HairColor { id: "platinum", name: "Platinum White", label: "铂金白", swatch: "#D1D5DB", prompt: "metallic platinum-white" },
    HairColor { id: "pink", name: "Pastel Pink", label: "樱花粉", swatch: "#FBCFE8", prompt: "soft pastel pink" },
    HairColor { id: "green", name: "Emerald Green", label: "翡翠绿", swatch: "#A7F3D0", prompt: "vibrant emerald green" },
    HairColor { id: "blue", name: "Electric Blue", label: "深邃蓝", swatch: "#93C5FD", prompt: "deep electric blue" },
    HairColor { id: "purple", name: "Royal Purple", label: "丁香紫", swatch: "#DDD6FE", prompt: "elegant royal purple" },
];

pub const FRINGE_STYLES: &[StyleOption] = &[
    StyleOption { id: "auto", label: "自动", prompt: "a natural hairstyle that suits their face" },
    StyleOption { id: "straight", label: "齐刘海", prompt: "thick, straight-across blunt bangs" },
    StyleOption { id: "side", label: "斜刘海", prompt: "elegant side-swept bangs" },
    StyleOption { id: "curtain", label: "八字刘海", prompt: "stylish curtain bangs parted in the middle" },
    StyleOption { id: "wispy", label: "空气刘海", prompt: "soft, thin wispy air bangs" },
];

pub const MAKEUP_STYLES: &[StyleOption] = &[
    StyleOption { id: "none", label: "无妆容", prompt: "no makeup, completely natural skin texture" },
    StyleOption { id: "clear_water", label: "白开水妆", prompt: "ultra-minimalist \"clear water\" makeup, translucent skin, almost invisible enhancements, pure and clean look" },
    StyleOption { id: "fox", label: "狐系妆容", prompt: "seductive fox-eye makeup style, featuring sharp elongated eyeliner, upturned eye corners, alluring warm tones, and sophisticated contouring for a mysterious and charming aesthetic" },
    StyleOption { id: "asian", label: "亚裔妆", prompt: "elegant classic Asian makeup style, enhancing natural features with soft contouring, warm tones, and graceful eye definition" },
    StyleOption { id: "korean", label: "韩系淡妆", prompt: "light Korean-style makeup, soft dewy skin, subtle natural lip tint, delicate eyeliner" },
    StyleOption { id: "korean_lead", label: "韩系女主妆", prompt: "elegant Korean lead actress makeup, radiant and sophisticated skin, polished eye definition, premium aesthetic" },
    StyleOption { id: "fashion", label: "时尚美妆", prompt: "sophisticated fashion makeup, editorial style, defined eye shadows, bold but elegant aesthetics" },
];

pub const CLOTHING_STYLES: &[StyleOption] = &[
    StyleOption { id: "tshirt", label: "简约白T", prompt: "a stylish oversized white t-shirt with a loose, relaxed fit. The fabric is a high-quality lightweight cotton that is slightly translucent, subtly revealing the vague silhouette of a delicate piece of white lingerie underneath, creating a pure yet alluring aesthetic." },
    StyleOption { id: "black_dress", label: "黑色小裙", prompt: "a chic and stylish classic little black dress (LBD), sophisticated minimalist design, elegant and modern silhouette, perfect for a high-end fashion portrait." },
    StyleOption { id: "uniform", label: "学院风制服", prompt: "classic high school academy uniform, pink collar, youthful and scholarly" },
    StyleOption { id: "hoodie", label: "宽松连帽卫衣", prompt: "a premium oversized hip-hop style hoodie from an international luxury fashion brand (like Balenciaga or Off-White), featuring bold designer graphics, heavy cotton textures, and a bureaucratic urban streetwear aesthetic." },
    StyleOption { id: "ancient", label: "古装", prompt: "a stunningly beautiful and sophisticated modern Hanfu or traditional ancient Chinese garment, featuring intricate embroidery, elegant flowing fabrics, and a contemporary aesthetic as seen in high-end cinematic ancient drama posters." },
    StyleOption { id: "techwear", label: "机能运动风", prompt: "modern techwear style, dark tactical fabrics, edgy and cool street aesthetic" },
    StyleOption { id: "big_shirt", label: "白色大衬衫", prompt: "an oversized crisp white button-down shirt made of a delicate, high-end fabric that is slightly translucent and faintly see-through in a subtle, elegant way. One side of the shirt drapes off-the-shoulder to reveal her shoulder and collarbone, creating a sophisticated and alluring aesthetic while maintaining a pure, just-woke-up look." },
    StyleOption { id: "bikini", label: "比基尼", prompt: "a stylish and elegant high-end bikini swimwear, aesthetic presentation, sophisticated beach or studio fashion, featuring a petite and slender flat-chested A-cup bustline." },
];

pub const EARRING_STYLES: &[StyleOption] = &[
    StyleOption { id: "none", label: "无", prompt: "She is not wearing any earrings." },
    StyleOption { id: "pearl", label: "珍珠耳钉", prompt: "She is wearing elegant, minimalist pearl stud earrings that add a touch of classic sophistication." },
    StyleOption { id: "hoops", label: "银色圆环", prompt: "She is wearing stylish medium-sized silver hoop earrings, giving her a modern and edgy look." },
    StyleOption { id: "drop", label: "水晶吊坠", prompt: "She is wearing exquisite crystal drop earrings that sparkle under the studio lights, creating a high-end fashion aesthetic." },
];

pub const GESTURE_STYLES: &[StyleOption] = &[
    StyleOption { id: "none", label: "无", prompt: "Her hands are not visible in the frame, or resting naturally at her sides." },
    StyleOption { id: "auto", label: "自动", prompt: "She is posing with a natural, professional modeling gesture that complements her face." },
    StyleOption { id: "v_sign", label: "剪刀手", prompt: "She is making a cute and playful V-sign (peace sign) with her hand near her face." },
    StyleOption { id: "heart", label: "比心", prompt: "She is making a charming finger-heart gesture with her hand, looking warmly at the camera." },
    StyleOption { id: "chin_rest", label: "托腮", prompt: "She is resting her chin gently on one hand, creating a thoughtful and graceful aesthetic." },
    StyleOption { id: "beckoning", label: "勾引", prompt: "She has one hand elegantly raised with the arm slightly bent. The palm is held slightly open, and the other fingers are naturally and gracefully curved. Her index finger is prominently extended and slightly bent, making a gentle, rhythmic \"come-hither\" hooking motion, as if she is alluringly summoning the viewer to come closer. Crucially, the thumb is tucked behind the palm and is not visible in the frame. The gesture is magnetic, seductive, and full of sophisticated charm." },
];

pub const EXPRESSION_STYLES: &[StyleOption] = &[
    StyleOption { id: "auto", label: "自动", prompt: "a natural and captivating facial expression that suits the mood" },
    StyleOption { id: "none", label: "娇羞", prompt: "a shy and coy facial expression, with a soft subtle blush on the cheeks, gently biting her lower lip in an endearing and nervous way, looking slightly away or down with an innocent and sweet gaze" },
    StyleOption { id: "sexy", label: "性感", prompt: "a sophisticated and effortlessly sexy expression with a touch of languid charm. Her eyes have a soft, dreamy, and slightly heavy-lidded lazy gaze (慵懒的眼神). Her lips are naturally and slightly parted in a relaxed, cool way. The expression is magnetic, confident, and full of sophisticated allure." },
    StyleOption { id: "slight_smile", label: "微笑", prompt: "a subtle, elegant, and gentle slight smile, radiating a soft and friendly warmth" },
    StyleOption { id: "smile", label: "笑", prompt: "a bright, warm, and radiant smile. The smile should look natural and authentic, following the character of the reference." },
];

pub fn find_style(options: &'static [StyleOption], id: &str) -> Option<&'static StyleOption> {
    options.iter().find(|option| option.id == id)
}

pub fn find_hair_color(id: &str) -> Option<&'static HairColor> {
    HAIR_COLORS.iter().find(|color| color.id == id)
}

pub fn style_ids(options: &'static [StyleOption]) -> Vec<&'static str> {
    options.iter().map(|option| option.id).collect()
}

pub fn hair_color_ids() -> Vec<&'static str> {
    HAIR_COLORS.iter().map(|color| color.id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn assert_category_invariants(name: &str, options: &'static [StyleOption]) {
        assert!(!options.is_empty(), "{name} catalog is empty");
        let mut seen = HashSet::new();
        for option in options {
            assert!(seen.insert(option.id), "{name} has duplicate id {}", option.id);
            assert!(!option.prompt.trim().is_empty(), "{name}/{} has empty prompt", option.id);
            assert!(!option.label.trim().is_empty(), "{name}/{} has empty label", option.id);
        }
    }

    #[test]
    fn all_categories_are_well_formed() {
        assert_category_invariants("fringe", FRINGE_STYLES);
        assert_category_invariants("makeup", MAKEUP_STYLES);
        assert_category_invariants("clothing", CLOTHING_STYLES);
        assert_category_invariants("earrings", EARRING_STYLES);
        assert_category_invariants("gesture", GESTURE_STYLES);
        assert_category_invariants("expression", EXPRESSION_STYLES);
    }

    #[test]
    fn hair_colors_are_well_formed() {
        assert!(!HAIR_COLORS.is_empty());
        let mut seen = HashSet::new();
        for color in HAIR_COLORS {
            assert!(seen.insert(color.id), "duplicate hair color id {}", color.id);
            assert!(!color.prompt.trim().is_empty());
            assert!(color.swatch.starts_with('#'), "swatch for {} is not a hex value", color.id);
        }
    }

    #[test]
    fn ancient_clothing_is_present() {
        assert!(find_style(CLOTHING_STYLES, ANCIENT_CLOTHING_ID).is_some());
    }

    #[test]
    fn lookup_by_id_returns_matching_option() {
        let silver = find_hair_color("silver").unwrap();
        assert_eq!(silver.name, "Silver White");
        assert_eq!(find_style(EXPRESSION_STYLES, "smile").unwrap().id, "smile");
        assert!(find_style(EXPRESSION_STYLES, "grimace").is_none());
    }
}
