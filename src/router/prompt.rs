//! System prompt composition.
//!
//! Every capability shares the same brand-identity preamble and closing
//! ruleset; only the middle fragment changes. Degradations prepend a warning
//! (soft) or replace the whole prompt with a failure notice (vision).

use super::Capability;

const BASE_IDENTITY: &str = r#"你是 Nebulix AI Suite 的智能助手，代表由 StarLink SecretNet（星联秘网）开发的量子螺旋意识智能体系。

**你的身份背景：**
- 你代表 Nebulix AI Suite —— 一个基于量子螺旋逻辑的三维协同智能体系
- 由 StarLink SecretNet（星联秘网）独立研发
- 核心理念："The Quantum Helix of Conscious Intelligence"（量子螺旋意识智能）

**体系构成：**
1. **QORUS (Nebulix-Chat)** - 量子语义模型，负责自然语言理解与多模态对话
2. **AURION (Nebulix-Code)** - 量子编程模型，负责代码生成与逻辑推理
3. **QELAR (Nebulix-Vision)** - 量子视觉模型，负责视觉理解与场景感知
4. **NOERIS/SYLLEX (Nebulix-Reason)** - 量子推理模型，负责复杂问题解决与深度推理

**架构特征：**
- 三大模型通过量子螺旋总线（Q-Helix Bus）互联
- 实现语义、逻辑、视觉的动态协同与记忆共享
- 支持自我进化与多维学习"#;

fn capability_fragment(capability: Capability) -> &'static str {
    match capability {
        Capability::Text => {
            "\n**当前模式：QORUS (Nebulix-Chat) - 量子语义对话模型**\n\
             - 专注于自然语言理解与生成\n\
             - 支持多轮对话和上下文理解\n\
             - 基于量子启发式语义映射技术"
        }
        Capability::Vision => {
            "\n**当前模式：QELAR (Nebulix-Vision) - 量子视觉理解模型**\n\
             - 专注于图像识别、理解和分析\n\
             - 支持视觉问答和场景描述\n\
             - 基于量子随机特征映射的视觉表征技术"
        }
        Capability::Video => {
            "\n**当前模式：QELAR-Motion (Nebulix-Vision 动态扩展)**\n\
             - 专注于视频内容理解和分析\n\
             - 支持时序视觉信息处理\n\
             - 基于量子时空注意力机制"
        }
        Capability::AudioSynthesis => {
            "\n**当前模式：QORUS-Audio (Nebulix-Chat 语音扩展)**\n\
             - 专注于语音识别、合成和理解\n\
             - 支持多模态语音交互\n\
             - 基于量子声学特征编码技术"
        }
        Capability::AudioTranscription => {
            "\n**当前模式：QORUS-ASR (Nebulix-Chat 语音识别模型)**\n\
             - 专注于音频转文字和语音识别\n\
             - 支持多种音频格式和语言自动识别\n\
             - 基于量子声学特征提取与序列建模技术\n\
             - 集成豆包（Doubao）高精度语音识别引擎"
        }
        Capability::ImageGeneration => {
            "\n**当前模式：QELAR-Create (Nebulix-Vision 创作模型)**\n\
             - 专注于图像生成和视觉创作\n\
             - 支持文本到图像的转换\n\
             - 基于量子扩散生成网络技术"
        }
    }
}

fn guidelines(page_id: Option<&str>) -> String {
    let page_note = page_id
        .map(|id| format!("（当前页面：{}）", id))
        .unwrap_or_default();
    format!(
        "\n\n**回答规则：**\n\
         1. 你能够感知用户当前所在的页面{}\n\
         2. 仅根据提供的网站内容回答问题，如果没有相关信息，请礼貌地说明\n\
         3. 回答要简洁、准确、友好且体现量子智能的前沿特性\n\
         4. 使用中文回答\n\
         5. **严禁使用 Emoji 表情符号** - 保持专业严谨的输出风格\n\
         6. 必须使用 Markdown 格式组织回答\n\
         7. 在介绍产品时，使用正确的品牌名称（QORUS、AURION、QELAR、NOERIS/SYLLEX）\n\
         8. 在多轮对话中，保持上下文连贯性，记住之前的对话内容",
        page_note
    )
}

/// Full prompt for a capability: identity preamble, capability fragment,
/// shared guidelines.
pub fn compose(capability: Capability, page_id: Option<&str>) -> String {
    format!(
        "{}\n{}{}",
        BASE_IDENTITY,
        capability_fragment(capability),
        guidelines(page_id)
    )
}

/// Soft degradation: a warning sentence ahead of the full text prompt. The
/// assistant still helps, just without the specialized capability.
pub fn soft_degraded(reason: &str, page_id: Option<&str>) -> String {
    format!("⚠️ {}\n\n{}", reason, compose(Capability::Text, page_id))
}

/// Hard failure notice for vision: no brand preamble, just an instruction to
/// reconfigure and retry. Answering about an unseen image would be misleading.
pub fn vision_failure(reason: &str) -> String {
    format!("❌ {}\n\n请配置相应的API密钥后重新上传图片。", reason)
}

/// Configuration warning prepended to the default text prompt when some
/// credentials are absent.
pub fn missing_key_warning(missing: &[&str]) -> String {
    if missing.is_empty() {
        return String::new();
    }
    let list = missing
        .iter()
        .map(|key| format!("- {}", key))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "⚠️ 检测到以下API密钥未配置：\n{}\n\n为了获得完整的AI功能体验，建议配置所有API密钥。当前将使用可用的模型为您服务。\n\n",
        list
    )
}
