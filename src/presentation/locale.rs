//! Reply text in the two languages the bot speaks.
//!
//! Slash commands and buttons answer in English; the `!` text commands
//! answer in Arabic.

use crate::application::services::{PrivilegeChange, TextCommandKind};
use crate::domain::errors::{AttachmentRule, ProfileError, UsernameRule};

/// Reply language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    /// Slash commands and interactions.
    #[default]
    English,
    /// Text commands.
    Arabic,
}

impl Locale {
    const fn pick(self, en: &'static str, ar: &'static str) -> &'static str {
        match self {
            Self::English => en,
            Self::Arabic => ar,
        }
    }

    /// Localized reply for a refused or failed command.
    #[must_use]
    pub fn error(self, err: &ProfileError) -> String {
        let ar = self == Self::Arabic;
        let text = match err {
            ProfileError::NotPermitted => self
                .pick(
                    "You do not have permission to use this command. You must have the required role.",
                    "ليس لديك صلاحية لاستخدام هذا الأمر.",
                )
                .to_string(),
            ProfileError::ImageLimitReached { max } => {
                if ar {
                    format!("يمكنك أن تحصل على {max} صور فقط. احذف صورة موجودة أولاً.")
                } else {
                    format!(
                        "You can only have up to {max} images. Delete an existing image first using `/deleteimage`."
                    )
                }
            }
            ProfileError::QuoteLimitReached { max } => {
                if ar {
                    format!("يمكنك أن تحصل على {max} نبذات فقط. احذف نبذة موجودة أولاً باستخدام `!حذف_نبذة`.")
                } else {
                    format!(
                        "You can only have up to {max} quotes. Delete an existing quote first using `/deletequote`."
                    )
                }
            }
            ProfileError::NoImages => self
                .pick("You don't have any images.", "ليس لديك أي صور.")
                .to_string(),
            ProfileError::NoQuotes => self
                .pick("You don't have any quotes.", "ليس لديك أي نبذات.")
                .to_string(),
            ProfileError::PositionOutOfRange { count } => {
                if ar {
                    format!("يجب أن يكون الموضع رقم بين 1 و {count}.")
                } else {
                    format!("Invalid position. Please choose a number between 1 and {count}.")
                }
            }
            ProfileError::SamePosition => self
                .pick(
                    "Source and destination positions cannot be the same.",
                    "لا يمكن أن تكون مواضع المصدر والوجهة متطابقة.",
                )
                .to_string(),
            ProfileError::UsernameTaken => self
                .pick("Username taken", "اسم المستخدم مستخدم بالفعل")
                .to_string(),
            ProfileError::InvalidUsername(rule) => self.username_rule(*rule),
            ProfileError::TextLength { max } => {
                if ar {
                    format!("يجب أن يكون النص بين 1 و {max} حرف.")
                } else {
                    format!("Text must be between 1 and {max} characters.")
                }
            }
            ProfileError::InvalidAttachment(rule) => self.attachment_rule(rule),
            ProfileError::ImageNotFound => self
                .pick("Image not found.", "لم يتم العثور على الصورة.")
                .to_string(),
            ProfileError::NothingToReset => self
                .pick(
                    "That user has no data to delete.",
                    "المستخدم ليس لديه أي بيانات لحذفها.",
                )
                .to_string(),
            ProfileError::NoChange
            | ProfileError::Store(_)
            | ProfileError::Upload(_) => self.generic_error().to_string(),
        };
        format!("❌ {text}")
    }

    fn username_rule(self, rule: UsernameRule) -> String {
        match rule {
            UsernameRule::TooShort => self.pick(
                "Username must be at least 2 characters long.",
                "يجب أن يكون اسم المستخدم حرفين على الأقل.",
            ),
            UsernameRule::TooLong => self.pick(
                "Username must be at most 20 characters long.",
                "يجب ألا يزيد اسم المستخدم عن 20 حرفاً.",
            ),
            UsernameRule::LettersOnly => self.pick(
                "Username can only contain English letters (a-z, A-Z).",
                "يمكن أن يحتوي اسم المستخدم على أحرف إنجليزية فقط (a-z, A-Z).",
            ),
            UsernameRule::UnsafeCharacters => self.pick(
                "Username contains unsafe characters. Please avoid: < > \" ' &",
                "يحتوي اسم المستخدم على رموز غير آمنة. تجنب: < > \" ' &",
            ),
        }
        .to_string()
    }

    fn attachment_rule(self, rule: &AttachmentRule) -> String {
        match rule {
            AttachmentRule::TooLarge { max_bytes } => {
                let mib = max_bytes / (1024 * 1024);
                match self {
                    Self::English => format!("File too large! Maximum size is {mib}MB."),
                    Self::Arabic => format!("الملف كبير جداً! الحد الأقصى {mib}MB."),
                }
            }
            AttachmentRule::UnsupportedType => self
                .pick(
                    "Invalid file type! Please upload a JPEG, PNG, GIF, or WebP image.",
                    "نوع الملف غير صالح! يرجى رفع صورة JPEG أو PNG أو GIF أو WebP.",
                )
                .to_string(),
            AttachmentRule::Incomplete => self
                .pick(
                    "Invalid attachment. Please try uploading again.",
                    "مرفق غير صالح. يرجى المحاولة مرة أخرى.",
                )
                .to_string(),
        }
    }

    #[must_use]
    pub const fn generic_error(self) -> &'static str {
        self.pick(
            "An unexpected error occurred. Please try again.",
            "حدث خطأ أثناء تنفيذ الأمر.",
        )
    }

    #[must_use]
    pub fn upload_done(self, count: usize, max: usize) -> String {
        match self {
            Self::English => format!("✅ Image uploaded successfully! ({count}/{max})"),
            Self::Arabic => format!("✅ تم رفع الصورة بنجاح! ({count}/{max})"),
        }
    }

    #[must_use]
    pub fn image_deleted(self, position: usize) -> String {
        match self {
            Self::English => format!("✅ Image at position {position} deleted successfully!"),
            Self::Arabic => format!("✅ تم حذف الصورة في الموضع {position} بنجاح!"),
        }
    }

    #[must_use]
    pub fn images_reordered(self, from: usize, to: usize) -> String {
        match self {
            Self::English => format!("✅ Image moved from position {from} to position {to}!"),
            Self::Arabic => format!("✅ تم نقل الصورة من الموضع {from} إلى الموضع {to}!"),
        }
    }

    #[must_use]
    pub fn quote_added(self, count: usize, max: usize) -> String {
        match self {
            Self::English => {
                format!("✅ Quote added successfully! You now have {count}/{max} quotes.")
            }
            Self::Arabic => format!("✅ تم إضافة النبذة بنجاح! لديك الآن {count}/{max} نبذة."),
        }
    }

    #[must_use]
    pub fn quote_deleted(self, position: usize) -> String {
        match self {
            Self::English => format!("✅ Quote at position {position} deleted successfully!"),
            Self::Arabic => format!("✅ تم حذف النبذة في الموضع {position} بنجاح!"),
        }
    }

    #[must_use]
    pub fn quotes_reordered(self, from: usize, to: usize) -> String {
        match self {
            Self::English => format!("✅ Quote moved from position {from} to position {to}!"),
            Self::Arabic => format!("✅ تم نقل النبذة من الموضع {from} إلى الموضع {to}!"),
        }
    }

    #[must_use]
    pub fn username_set(self, username: &str) -> String {
        match self {
            Self::English => format!("✅ Username set to **{username}**!"),
            Self::Arabic => format!("✅ تم تعيين اسم المستخدم إلى **{username}**!"),
        }
    }

    #[must_use]
    pub const fn rate_limited(self) -> &'static str {
        self.pick(
            "❌ You're clicking too fast! Please wait a moment before trying again.",
            "❌ أنت تضغط بسرعة كبيرة! انتظر قليلاً ثم حاول مجدداً.",
        )
    }

    #[must_use]
    pub const fn not_requester(self) -> &'static str {
        self.pick(
            "❌ Only the person who requested this profile can use these buttons.",
            "❌ فقط الشخص الذي طلب هذا الملف يمكنه استخدام هذه الأزرار.",
        )
    }

    #[must_use]
    pub const fn unknown_action(self) -> &'static str {
        self.pick(
            "❌ This button is no longer supported. Run /profile again.",
            "❌ هذا الزر لم يعد مدعوماً. أعد تشغيل الأمر مرة أخرى.",
        )
    }

    #[must_use]
    pub const fn invalid_navigation(self) -> &'static str {
        self.pick(
            "❌ Invalid navigation request. Please try again.",
            "❌ طلب تنقل غير صالح. حاول مرة أخرى.",
        )
    }

    #[must_use]
    pub const fn comment_saved(self) -> &'static str {
        self.pick("✅ Comment posted!", "✅ تم نشر التعليق!")
    }

    #[must_use]
    pub const fn user_not_found(self) -> &'static str {
        self.pick("❌ User not found.", "❌ لم يتم العثور على المستخدم.")
    }

    /// Usage hint for a text command with missing or malformed arguments.
    #[must_use]
    pub fn usage(kind: TextCommandKind) -> String {
        let alias = kind.alias();
        match kind {
            TextCommandKind::Profile => format!("❌ الاستخدام: `{alias} [@مستخدم]`"),
            TextCommandKind::DeleteImage | TextCommandKind::DeleteQuote => {
                format!("❌ الاستخدام: `{alias} [الموضع]`\nمثال: `{alias} 1`")
            }
            TextCommandKind::Reorder => {
                format!("❌ الاستخدام: `{alias} [من] [إلى]`\nمثال: `{alias} 1 3`")
            }
            TextCommandKind::AddQuote => {
                format!("❤️ الاستخدام: `{alias} [النص]`\nمثال: `{alias} أحب البرمجة والتصميم`")
            }
            TextCommandKind::SetUsername => {
                format!("❤️ الاستخدام: `{alias} [الاسم_الجديد]`\nمثال: `{alias} محمد`")
            }
            TextCommandKind::ResetUser => {
                format!("❌ الاستخدام: `{alias} [@مستخدم]` أو `{alias} [معرف_المستخدم]`")
            }
            TextCommandKind::GrantPrivilege => format!(
                "❤️ الاستخدام: `{alias} [@مستخدم]` أو `{alias} [معرف_المستخدم]` أو `{alias} قائمة` لعرض القائمة"
            ),
        }
    }

    /// Title of the privilege change embed.
    #[must_use]
    pub const fn privilege_title(change: PrivilegeChange) -> &'static str {
        match change {
            PrivilegeChange::Granted => "✅ تم منح الصلاحية",
            PrivilegeChange::Revoked => "❌ تم إزالة الصلاحية",
        }
    }
}

/// Labels and headings used by gallery embeds and buttons.
#[derive(Debug, Clone, Copy)]
pub struct GalleryText {
    locale: Locale,
}

impl GalleryText {
    #[must_use]
    pub const fn new(locale: Locale) -> Self {
        Self { locale }
    }

    #[must_use]
    pub fn title(&self, name: &str) -> String {
        match self.locale {
            Locale::English => format!("📸 {name}'s Gallery"),
            Locale::Arabic => format!("📸 معرض {name}"),
        }
    }

    #[must_use]
    pub fn footer(&self, position: usize, total: usize, likes: u32) -> String {
        match self.locale {
            Locale::English => format!("Image {position} of {total} • {likes} likes"),
            Locale::Arabic => format!("الصورة {position} من {total} • {likes} إعجاب"),
        }
    }

    #[must_use]
    pub const fn quotes_heading(&self) -> &'static str {
        self.locale.pick("**Quotes:**", "**النبذات:**")
    }

    #[must_use]
    pub const fn comments_heading(&self) -> &'static str {
        self.locale.pick("**Latest comments:**", "**أحدث التعليقات:**")
    }

    #[must_use]
    pub const fn animated_notice(&self) -> &'static str {
        self.locale
            .pick("🎬 **Animated GIF** 🎬", "🎬 **صورة متحركة** 🎬")
    }

    #[must_use]
    pub const fn fallback_notice(&self) -> &'static str {
        self.locale.pick(
            "⚠️ **Image Processing Issue** - Showing original image",
            "⚠️ **تعذرت معالجة الصورة** - عرض الصورة الأصلية",
        )
    }

    #[must_use]
    pub const fn empty_title(&self) -> &'static str {
        self.locale.pick("📸 Gallery", "📸 معرض الصور")
    }

    #[must_use]
    pub fn empty_description(&self, own: bool, name: &str) -> String {
        match (self.locale, own) {
            (Locale::English, true) => "You don't have any images uploaded yet!".to_string(),
            (Locale::English, false) => format!("{name} doesn't have any images uploaded yet!"),
            (Locale::Arabic, true) => "لا توجد صور محملة بعد!".to_string(),
            (Locale::Arabic, false) => format!("{name} ليس لديه صور محملة بعد!"),
        }
    }

    #[must_use]
    pub const fn username_field(&self) -> &'static str {
        self.locale.pick("👤 Username", "👤 اسم المستخدم")
    }

    #[must_use]
    pub const fn not_set(&self) -> &'static str {
        self.locale.pick("Not set", "غير محدد")
    }

    #[must_use]
    pub const fn images_field(&self) -> &'static str {
        self.locale.pick("📷 Images", "📷 الصور")
    }

    #[must_use]
    pub const fn previous(&self) -> &'static str {
        self.locale.pick("Previous", "السابق")
    }

    #[must_use]
    pub const fn next(&self) -> &'static str {
        self.locale.pick("Next", "التالي")
    }

    #[must_use]
    pub const fn like(&self, liked: bool) -> &'static str {
        if liked {
            self.locale.pick("Unlike", "إلغاء الإعجاب")
        } else {
            self.locale.pick("Like", "إعجاب")
        }
    }

    #[must_use]
    pub const fn comment(&self) -> &'static str {
        self.locale.pick("Comment", "تعليق")
    }

    #[must_use]
    pub const fn support(&self) -> &'static str {
        self.locale.pick("Support", "دعم")
    }

    #[must_use]
    pub const fn comment_modal_title(&self) -> &'static str {
        self.locale.pick("Add a comment", "أضف تعليقاً")
    }

    #[must_use]
    pub const fn comment_input_label(&self) -> &'static str {
        self.locale.pick("Your comment", "تعليقك")
    }
}
