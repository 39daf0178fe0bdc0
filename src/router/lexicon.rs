use serde::{Deserialize, Serialize};

/// Keyword lists driving capability detection.
///
/// The lists are heuristic and locale-specific (mixed Chinese and English),
/// so they are data rather than logic: tests substitute fixture lexicons and
/// deployments can ship revised lists without touching the router.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lexicon {
    pub version: u32,
    pub image_generation: Vec<String>,
    pub video: Vec<String>,
    pub audio: Vec<String>,
}

impl Lexicon {
    /// The built-in keyword lists.
    pub fn builtin() -> Self {
        let owned = |words: &[&str]| words.iter().map(|w| w.to_string()).collect();
        Lexicon {
            version: 1,
            image_generation: owned(&[
                "生成图片",
                "生成图像",
                "画一个",
                "画一幅",
                "画一只",
                "创建图片",
                "创建图像",
                "绘制",
                "制作图片",
                "制作图像",
                "设计图片",
                "设计图像",
                "generate image",
                "create image",
                "draw",
                "make a picture",
                "帮我画",
                "帮我生成",
                "QELAR",
                "qelar",
                "画个",
                "来张",
                "来一张",
                "做一张",
                "给我画",
                "给我生成",
                "图像创作",
                "图片创作",
                "生成海报",
                "生成插画",
                "生成logo",
                "画出",
                "展示一张",
                "可视化",
                "艺术创作",
            ]),
            video: owned(&[
                "视频",
                "影片",
                "录像",
                "动画",
                "生成视频",
                "创建视频",
                "video",
                "movie",
                "animation",
                "视频分析",
                "视频理解",
                "播放",
                "电影",
                "短片",
                "视频剪辑",
                "视频编辑",
            ]),
            audio: owned(&[
                "语音",
                "声音",
                "音频",
                "朗读",
                "语音合成",
                "文本转语音",
                "audio",
                "voice",
                "speech",
                "tts",
                "text to speech",
                "说话",
                "语音识别",
                "语音转文字",
                "音频分析",
            ]),
        }
    }

    /// Case-insensitive substring match against one keyword list. Not
    /// tokenized: a keyword anywhere inside a longer message matches.
    fn matches(list: &[String], content: &str) -> bool {
        let lowered = content.to_lowercase();
        list.iter().any(|kw| lowered.contains(&kw.to_lowercase()))
    }

    pub fn is_image_generation(&self, content: &str) -> bool {
        Self::matches(&self.image_generation, content)
    }

    pub fn is_video(&self, content: &str) -> bool {
        Self::matches(&self.video, content)
    }

    pub fn is_audio(&self, content: &str) -> bool {
        Self::matches(&self.audio, content)
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substring_match_inside_longer_text() {
        let lexicon = Lexicon::builtin();
        assert!(lexicon.is_image_generation("今天天气不错，不过请帮我画一只猫"));
        assert!(lexicon.is_video("能帮我分析这段视频吗"));
        assert!(lexicon.is_audio("请把这段文字转成语音"));
    }

    #[test]
    fn test_measure_word_draw_requests_match() {
        // 画一只 / 画一个 / 画一幅 are distinct measure-word forms; each must
        // trigger image generation on its own.
        let lexicon = Lexicon::builtin();
        assert!(lexicon.is_image_generation("画一只猫"));
        assert!(lexicon.is_image_generation("画一个机器人"));
        assert!(lexicon.is_image_generation("画一幅星空"));
    }

    #[test]
    fn test_case_insensitive() {
        let lexicon = Lexicon::builtin();
        assert!(lexicon.is_image_generation("please Generate IMAGE of a cat"));
        assert!(lexicon.is_video("play this MOVIE"));
        assert!(lexicon.is_audio("read this with TTS"));
    }

    #[test]
    fn test_no_match() {
        let lexicon = Lexicon::builtin();
        assert!(!lexicon.is_image_generation("今天天气怎么样"));
        assert!(!lexicon.is_video("hello there"));
        assert!(!lexicon.is_audio("写一首诗"));
    }

    #[test]
    fn test_fixture_lexicon_substitution() {
        let lexicon = Lexicon {
            version: 99,
            image_generation: vec!["sketchme".to_string()],
            video: vec![],
            audio: vec![],
        };
        assert!(lexicon.is_image_generation("SketchMe a dog"));
        assert!(!lexicon.is_image_generation("画一只猫"));
    }

    #[test]
    fn test_roundtrips_through_serde() {
        let lexicon = Lexicon::builtin();
        let json = serde_json::to_string(&lexicon).unwrap();
        let back: Lexicon = serde_json::from_str(&json).unwrap();
        assert_eq!(lexicon, back);
    }
}
