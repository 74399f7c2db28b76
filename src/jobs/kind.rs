use crate::foundation::error::{ClipforgeError, ClipforgeResult};

/// Broad family of an AI job, which decides what happens with its result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobCategory {
    /// Creates new media.
    Generation,
    /// Edits timeline content.
    Editing,
    /// Improves existing media in place.
    Enhancement,
    /// Creator workflow helpers.
    Creator,
    /// Text answers and analysis.
    Assistant,
    /// Audience and publishing tools.
    Growth,
    /// Experimental tools producing downloads.
    Experimental,
}

/// Follow-up the editor offers once a job completes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompletionAction {
    /// Add the result to the media library.
    AddToAssets,
    /// Place the result on the timeline.
    ApplyToTimeline,
    /// Swap the source media for the result.
    ReplaceOriginal,
    /// Show the result in a panel.
    ShowResults,
    /// Offer the result as a download.
    Download,
}

impl JobCategory {
    /// Stable lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Generation => "generation",
            Self::Editing => "editing",
            Self::Enhancement => "enhancement",
            Self::Creator => "creator",
            Self::Assistant => "assistant",
            Self::Growth => "growth",
            Self::Experimental => "experimental",
        }
    }

    /// What the editor does with a finished job of this category.
    pub fn completion_action(self) -> CompletionAction {
        match self {
            Self::Generation => CompletionAction::AddToAssets,
            Self::Editing | Self::Creator => CompletionAction::ApplyToTimeline,
            Self::Enhancement => CompletionAction::ReplaceOriginal,
            Self::Assistant | Self::Growth => CompletionAction::ShowResults,
            Self::Experimental => CompletionAction::Download,
        }
    }
}

macro_rules! job_kinds {
    ($($variant:ident => ($tag:literal, $cat:ident, $label:literal),)+) => {
        /// Every AI job the remote service accepts, keyed by its wire tag.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub enum JobKind {
            $(#[doc = $label] $variant,)+
        }

        impl JobKind {
            /// Every job kind in declaration order.
            pub const ALL: &'static [JobKind] = &[$(JobKind::$variant,)+];

            /// Wire tag, e.g. `"image.generate"`.
            pub fn as_tag(self) -> &'static str {
                match self {
                    $(Self::$variant => $tag,)+
                }
            }

            /// Category this job belongs to.
            pub fn category(self) -> JobCategory {
                match self {
                    $(Self::$variant => JobCategory::$cat,)+
                }
            }

            /// Human-readable name for notifications.
            pub fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }
        }
    };
}

job_kinds! {
    ImageGenerate => ("image.generate", Generation, "Image Generation"),
    VideoGenerate => ("video.generate", Generation, "Video Generation"),
    VoiceClone => ("voice.clone", Generation, "Voice Clone"),
    MusicGenerate => ("music.generate", Generation, "Music Generation"),
    BrollGenerate => ("broll.generate", Generation, "B-Roll Generation"),
    LogoGenerate => ("logo.generate", Generation, "Logo Generation"),
    StickerGenerate => ("sticker.generate", Generation, "Sticker Generation"),
    CharacterGenerate => ("character.generate", Generation, "Character Generation"),
    AutoCut => ("auto.cut", Editing, "Auto Cut"),
    HighlightDetect => ("highlight.detect", Editing, "Highlight Detection"),
    TimelineSuggest => ("timeline.suggest", Editing, "Timeline Intelligence"),
    MotionAutoKeyframe => ("motion.autoKeyframe", Editing, "Motion AI"),
    MotionAutoEasing => ("motion.autoEasing", Editing, "Motion Easing"),
    CameraShake => ("camera.shake", Editing, "Camera Shake"),
    ParallaxCreate => ("parallax.create", Editing, "Parallax Effect"),
    Enhance => ("enhance", Enhancement, "Auto Enhance"),
    Upscale => ("upscale", Enhancement, "Auto Upscale"),
    HdrEnhance => ("hdr.enhance", Enhancement, "HDR Enhancement"),
    SkinCorrect => ("skin.correct", Enhancement, "Skin Correction"),
    FlickerRemove => ("flicker.remove", Enhancement, "Flicker Removal"),
    FaceRestore => ("face.restore", Enhancement, "Face Restoration"),
    VideoRestore => ("video.restore", Enhancement, "Video Restoration"),
    AutoSubtitle => ("auto.subtitle", Creator, "Auto Subtitles"),
    SubtitleAnimate => ("subtitle.animate", Creator, "Subtitle Animation"),
    EmojiInsert => ("emoji.insert", Creator, "Emoji Insertion"),
    TemplateApply => ("template.apply", Creator, "Template Application"),
    BrandApply => ("brand.apply", Creator, "Brand Kit"),
    ObjectTrack => ("object.track", Creator, "Object Tracking"),
    FaceTrack => ("face.track", Creator, "Face Tracking"),
    EffectGlow => ("effect.glow", Creator, "Glow Effect"),
    EffectBlur => ("effect.blur", Creator, "Blur Effect"),
    GreenscreenRemove => ("greenscreen.remove", Creator, "Green Screen Removal"),
    ChatHelp => ("chat.help", Assistant, "AI Assistant"),
    CommandCinematic => ("command.cinematic", Assistant, "Cinematic Mode"),
    CommandFixColorAudio => ("command.fixColorAudio", Assistant, "Fix Color & Audio"),
    CommandViralReel => ("command.viralReel", Assistant, "Viral Reel"),
    HelpStepByStep => ("help.stepByStep", Assistant, "Step-by-Step Guide"),
    HelpExplain => ("help.explain", Assistant, "Concept Explanation"),
    TitleGenerate => ("title.generate", Growth, "Title Generation"),
    HookGenerate => ("hook.generate", Growth, "Hook Generation"),
    CaptionGenerate => ("caption.generate", Growth, "Caption Generation"),
    HashtagGenerate => ("hashtag.generate", Growth, "Hashtag Generation"),
    ViralityPredict => ("virality.predict", Growth, "Virality Prediction"),
    PostTimeSuggest => ("postTime.suggest", Growth, "Post Time Optimization"),
    AbTestCreate => ("abTest.create", Growth, "A/B Test Creation"),
    ActorReplace => ("actor.replace", Experimental, "Actor Replacement"),
    AvatarCreate => ("avatar.create", Experimental, "AI Avatar"),
    EyeContactCorrect => ("eyeContact.correct", Experimental, "Eye Contact Correction"),
    GestureAdd => ("gesture.add", Experimental, "Gesture Addition"),
    ScriptToVideo => ("script.toVideo", Experimental, "Script to Video"),
    CameraFrame => ("camera.frame", Experimental, "Camera Framing"),
    TextToShortVideo => ("text.toShortVideo", Experimental, "Text to Short Video"),
}

impl JobKind {
    /// Exact, case-sensitive tag lookup.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.as_tag() == tag)
    }

    /// Generation jobs whose output lands in the asset library as new media.
    pub fn produces_media(self) -> bool {
        self.category() == JobCategory::Generation
    }
}

impl std::fmt::Display for JobKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_tag())
    }
}

impl std::str::FromStr for JobKind {
    type Err = ClipforgeError;

    fn from_str(s: &str) -> ClipforgeResult<Self> {
        Self::from_tag(s)
            .ok_or_else(|| ClipforgeError::validation(format!("unknown job type '{s}'")))
    }
}

impl TryFrom<String> for JobKind {
    type Error = ClipforgeError;

    fn try_from(s: String) -> ClipforgeResult<Self> {
        s.parse()
    }
}

impl From<JobKind> for String {
    fn from(k: JobKind) -> Self {
        k.as_tag().to_string()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/jobs/kind.rs"]
mod tests;
