//! Built-in English and Amharic message tables.

use std::collections::HashMap;

use super::{Button, ButtonRequest, Keyboard, Language, Localizer, PromptKey, SELECTED_MARK};
use crate::booking::event::{EditField, MenuAction};
use crate::booking::model::{LocationSource, PhoneSource, ServiceId, ServiceItem, ServiceType};
use crate::booking::prompt::{MenuRef, Param, PromptRef};

/// Static message catalog with a reverse index from labels to actions.
pub struct Catalog {
    index: HashMap<Language, HashMap<String, MenuAction>>,
}

impl Catalog {
    pub fn new() -> Self {
        let index = Language::ALL
            .into_iter()
            .map(|lang| {
                let labels = MenuAction::all()
                    .into_iter()
                    .map(|action| (label(lang, action).to_string(), action))
                    .collect();
                (lang, labels)
            })
            .collect();
        Self { index }
    }

    fn lookup(&self, language: Language, text: &str) -> Option<MenuAction> {
        self.index.get(&language)?.get(text).copied()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Localizer for Catalog {
    fn resolve(&self, language: Language, prompt: &PromptRef) -> String {
        fill(template(language, prompt.key), |name| {
            prompt.param(name).map(|value| render_param(language, value))
        })
    }

    fn resolve_menu(&self, language: Language, menu: &MenuRef) -> Keyboard {
        let button = |action| Button::new(label(language, action));
        let rows = match menu {
            MenuRef::Remove => return Keyboard::Remove,
            MenuRef::Main => vec![vec![
                button(MenuAction::StartBooking),
                button(MenuAction::ShowInfo),
                button(MenuAction::OpenSettings),
            ]],
            MenuRef::BackToMain => vec![vec![button(MenuAction::MainMenu)]],
            MenuRef::Settings => vec![
                vec![button(MenuAction::ChangeLanguage)],
                vec![button(MenuAction::MainMenu)],
            ],
            MenuRef::Language => vec![
                Language::ALL
                    .into_iter()
                    .map(|l| button(MenuAction::PickLanguage(l)))
                    .collect(),
            ],
            MenuRef::ServiceType => vec![vec![
                button(MenuAction::ServiceType(ServiceType::Permanent)),
                button(MenuAction::ServiceType(ServiceType::Temporary)),
            ]],
            MenuRef::Services { selected } => {
                let mut rows: Vec<Vec<Button>> = ServiceId::ALL
                    .chunks(2)
                    .map(|pair| {
                        pair.iter()
                            .map(|id| {
                                let text = label(language, MenuAction::Service(*id));
                                if selected.contains(id) {
                                    Button::new(format!("{SELECTED_MARK}{text}"))
                                } else {
                                    Button::new(text)
                                }
                            })
                            .collect()
                    })
                    .collect();
                rows.push(vec![button(MenuAction::OtherService)]);
                rows.push(vec![button(MenuAction::DoneSelecting)]);
                rows
            }
            MenuRef::ContactCheck => vec![vec![
                button(MenuAction::UseSavedInfo),
                button(MenuAction::UpdateInfo),
            ]],
            MenuRef::NameConfirm => vec![vec![
                button(MenuAction::UseDetectedName),
                button(MenuAction::EnterDifferentName),
            ]],
            MenuRef::Phone => vec![
                vec![Button::requesting(
                    label(language, MenuAction::SharePhone),
                    ButtonRequest::Contact,
                )],
                vec![button(MenuAction::EnterPhoneManually)],
            ],
            MenuRef::Location => vec![
                vec![Button::requesting(
                    label(language, MenuAction::ShareLocation),
                    ButtonRequest::Location,
                )],
                vec![button(MenuAction::EnterLocationManually)],
            ],
            MenuRef::Review { with_location } => {
                let mut rows = vec![
                    vec![button(MenuAction::ConfirmSubmit)],
                    vec![
                        button(MenuAction::Edit(EditField::ServiceType)),
                        button(MenuAction::Edit(EditField::Services)),
                    ],
                    vec![
                        button(MenuAction::Edit(EditField::Name)),
                        button(MenuAction::Edit(EditField::Phone)),
                    ],
                ];
                if *with_location {
                    rows.push(vec![button(MenuAction::Edit(EditField::Location))]);
                }
                rows.push(vec![button(MenuAction::CancelRequest)]);
                rows
            }
            MenuRef::PostSubmission => vec![vec![
                button(MenuAction::NewRequest),
                button(MenuAction::MainMenu),
            ]],
        };
        Keyboard::Rows(rows)
    }

    fn match_label(&self, language: Language, label: &str) -> Option<MenuAction> {
        let text = label.trim();
        let text = text.strip_prefix(SELECTED_MARK).unwrap_or(text).trim();
        if text.is_empty() {
            return None;
        }
        self.lookup(language, text).or_else(|| {
            Language::ALL
                .into_iter()
                .filter(|l| *l != language)
                .find_map(|l| self.lookup(l, text))
        })
    }
}

/// Replace each `{name}` in `template` in a single left-to-right pass.
/// Inserted values are never scanned again; unknown names are left as is.
fn fill(template: &str, value_of: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            rest = &rest[open..];
            break;
        };
        let name = &after[..close];
        match value_of(name) {
            Some(value) => out.push_str(&value),
            None => out.push_str(&rest[open..open + close + 2]),
        }
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    out
}

fn render_param(language: Language, param: &Param) -> String {
    match param {
        Param::Text(text) => text.clone(),
        Param::ServiceType(ty) => service_type_name(language, *ty).to_string(),
        Param::Service(item) => item_label(language, item),
        Param::Services(items) if items.is_empty() => "-".to_string(),
        Param::Services(items) => items
            .iter()
            .map(|item| item_label(language, item))
            .collect::<Vec<_>>()
            .join(", "),
        Param::PhoneSource(source) => phone_source_tag(language, *source).to_string(),
        Param::Location(None) => String::new(),
        Param::Location(Some(location)) => {
            let heading = match language {
                Language::English => "Location",
                Language::Amharic => "አድራሻ",
            };
            format!(
                "\n📍 *{heading}:* {} {}",
                location.value,
                location_source_tag(language, location.source)
            )
        }
        Param::LocationSource(source) => location_source_tag(language, *source).to_string(),
        Param::Language(lang) => lang.native_name().to_string(),
    }
}

fn item_label(language: Language, item: &ServiceItem) -> String {
    match (item, language) {
        (ServiceItem::Catalog(id), _) => label(language, MenuAction::Service(*id)).to_string(),
        (ServiceItem::Other(text), Language::English) => format!("📝 Other: {text}"),
        (ServiceItem::Other(text), Language::Amharic) => format!("📝 ሌላ: {text}"),
    }
}

fn service_type_name(language: Language, ty: ServiceType) -> &'static str {
    match (language, ty) {
        (Language::English, ServiceType::Permanent) => "Permanent",
        (Language::English, ServiceType::Temporary) => "Temporary",
        (Language::Amharic, ServiceType::Permanent) => "ቋሚ",
        (Language::Amharic, ServiceType::Temporary) => "ጊዜያዊ",
    }
}

fn phone_source_tag(language: Language, source: PhoneSource) -> &'static str {
    match (language, source) {
        (Language::English, PhoneSource::SharedContact) => "(✅ Verified)",
        (Language::English, PhoneSource::ManualEntry) => "(📝 Manual)",
        (Language::Amharic, PhoneSource::SharedContact) => "(✅ የተረጋገጠ)",
        (Language::Amharic, PhoneSource::ManualEntry) => "(📝 በእጅ የገባ)",
    }
}

fn location_source_tag(language: Language, source: LocationSource) -> &'static str {
    match (language, source) {
        (Language::English, LocationSource::Gps) => "(📍 GPS)",
        (Language::English, LocationSource::ManualEntry) => "(📝 Manual)",
        (Language::Amharic, LocationSource::Gps) => "(📍 GPS)",
        (Language::Amharic, LocationSource::ManualEntry) => "(📝 በእጅ የገባ)",
    }
}

/// Button label for an action.
fn label(language: Language, action: MenuAction) -> &'static str {
    use MenuAction as A;
    match language {
        Language::English => match action {
            A::StartBooking => "🚀 Start",
            A::ShowInfo => "ℹ️ Info",
            A::OpenSettings => "⚙️ Settings",
            A::MainMenu => "🏠 Back to Main Menu",
            A::ChangeLanguage => "🌍 Change Language",
            A::PickLanguage(Language::English) => "🇬🇧 English",
            A::PickLanguage(Language::Amharic) => "🇪🇹 Amharic",
            A::ServiceType(ServiceType::Permanent) => "⏰ Permanent",
            A::ServiceType(ServiceType::Temporary) => "🔄 Temporary",
            A::Service(ServiceId::FullHouseWork) => "🧹 Full House Work",
            A::Service(ServiceId::HouseCleaning) => "🏠 House Cleaning",
            A::Service(ServiceId::Laundry) => "👕 Laundry Service",
            A::Service(ServiceId::Cooking) => "🍳 Cooking Service",
            A::Service(ServiceId::ChildCare) => "👶 Child Care",
            A::Service(ServiceId::ElderCare) => "👵 Elder Care",
            A::Service(ServiceId::PetCare) => "🐕 Pet Care",
            A::Service(ServiceId::Gardening) => "🌿 Gardening",
            A::OtherService => "📝 Other (Specify)",
            A::DoneSelecting => "✅ Done Selecting",
            A::UseSavedInfo => "✅ Use Saved Info",
            A::UpdateInfo => "✏️ Update Info",
            A::UseDetectedName => "✅ Use My Telegram Name",
            A::EnterDifferentName => "✏️ Enter Different Name",
            A::SharePhone => "📱 Share My Phone Number",
            A::EnterPhoneManually => "✏️ Enter Phone Manually",
            A::ShareLocation => "📍 Share My Location",
            A::EnterLocationManually => "✏️ Enter Address Manually",
            A::ConfirmSubmit => "✅ Confirm & Submit Request",
            A::Edit(EditField::ServiceType) => "✏️ Edit Service Type",
            A::Edit(EditField::Services) => "✏️ Edit Services",
            A::Edit(EditField::Name) => "✏️ Edit Name",
            A::Edit(EditField::Phone) => "✏️ Edit Phone",
            A::Edit(EditField::Location) => "✏️ Edit Location",
            A::CancelRequest => "❌ Cancel Request",
            A::NewRequest => "🔄 New Request",
        },
        Language::Amharic => match action {
            A::StartBooking => "🚀 ጀምር",
            A::ShowInfo => "ℹ️ መረጃ",
            A::OpenSettings => "⚙️ ቅንብሮች",
            A::MainMenu => "🏠 ወደ ዋና ምናሌ ተመለስ",
            A::ChangeLanguage => "🌍 ቋንቋ ቀይር",
            A::PickLanguage(Language::English) => "🇬🇧 English",
            A::PickLanguage(Language::Amharic) => "🇪🇹 Amharic",
            A::ServiceType(ServiceType::Permanent) => "⏰ ቋሚ",
            A::ServiceType(ServiceType::Temporary) => "🔄 ጊዜያዊ",
            A::Service(ServiceId::FullHouseWork) => "🧹 ሙሉ የቤት ስራ",
            A::Service(ServiceId::HouseCleaning) => "🏠 የቤት ፍጽምና",
            A::Service(ServiceId::Laundry) => "👕 የልብስ ማጠቢያ",
            A::Service(ServiceId::Cooking) => "🍳 የምግብ አበዳሪ",
            A::Service(ServiceId::ChildCare) => "👶 የህጻን እንክብካቤ",
            A::Service(ServiceId::ElderCare) => "👵 የአዛውንት እንክብካቤ",
            A::Service(ServiceId::PetCare) => "🐕 የቤት እንስሳት",
            A::Service(ServiceId::Gardening) => "🌿 የአትክልት ስራ",
            A::OtherService => "📝 ሌላ (ይግለጹ)",
            A::DoneSelecting => "✅ መርጬ ጨርሻለሁ",
            A::UseSavedInfo => "✅ የተቀመጠውን መረጃ ተጠቀም",
            A::UpdateInfo => "✏️ መረጃ አዘምን",
            A::UseDetectedName => "✅ የቴሌግራም ስሜን ተጠቀም",
            A::EnterDifferentName => "✏️ ሌላ ስም አስገባ",
            A::SharePhone => "📱 ስልክ ቁጥሬን አጋራ",
            A::EnterPhoneManually => "✏️ ስልክ በእጅ አስገባ",
            A::ShareLocation => "📍 አካባቢዬን አጋራ",
            A::EnterLocationManually => "✏️ አድራሻ በእጅ አስገባ",
            A::ConfirmSubmit => "✅ አረጋግጥ እና ላክ",
            A::Edit(EditField::ServiceType) => "✏️ አገልግሎት አይነት ቀይር",
            A::Edit(EditField::Services) => "✏️ አገልግሎቶች ቀይር",
            A::Edit(EditField::Name) => "✏️ ስም ቀይር",
            A::Edit(EditField::Phone) => "✏️ ስልክ ቀይር",
            A::Edit(EditField::Location) => "✏️ አድራሻ ቀይር",
            A::CancelRequest => "❌ ሰርዝ",
            A::NewRequest => "🔄 አዲስ ጥያቄ",
        },
    }
}

fn template(language: Language, key: PromptKey) -> &'static str {
    match language {
        Language::English => english(key),
        Language::Amharic => amharic(key),
    }
}

fn english(key: PromptKey) -> &'static str {
    use PromptKey as K;
    match key {
        K::Welcome => {
            "👋 *Welcome to Liyu Agency!* 🏠\n\n\
             Hello {user_name}! We're delighted to have you here.\n\n\
             We connect you with professional, verified staff for all your household needs.\n\n\
             🚀 *Start* - Request a service\n\
             ℹ️ *Info* - Learn more about us\n\
             ⚙️ *Settings* - Adjust your preferences\n\n\
             Choose an option below to continue:"
        }
        K::MainMenu => "🏠 *Main Menu*\n\nChoose an option below to continue:",
        K::Info => {
            "ℹ️ *About Liyu Agency* 🏠\n\n\
             Liyu Agency connects families in Addis Ababa with trusted household staff.\n\n\
             🛠️ *Our Services:*\n\
             • 🧹 Full House Work\n\
             • 🏠 House Cleaning\n\
             • 👕 Laundry Service\n\
             • 🍳 Cooking Service\n\
             • 👶 Child Care\n\
             • 👵 Elder Care\n\
             • 🐕 Pet Care\n\
             • 🌿 Gardening\n\n\
             ✅ All staff are background-checked and verified\n\
             ✅ Flexible permanent and temporary options\n\n\
             📞 Phone: +251-XXX-XXXX\n\
             📧 Email: info@liyuagency.com\n\
             🕗 Hours: 8:00 AM - 8:00 PM (Daily)\n\n\
             Ready to get started? Press 🚀 *Start* from the main menu!"
        }
        K::Settings => {
            "⚙️ *Settings*\n\n\
             🌍 *Language:* {current_language}\n\n\
             What would you like to adjust?"
        }
        K::LanguagePrompt => "🌍 *Choose your language:*",
        K::LanguageChanged => {
            "✅ *Language Updated!*\n\n\
             Your language has been changed to *{language}*.\n\n\
             Returning to main menu..."
        }
        K::Help => {
            "🤖 *Liyu Agency Bot - Help*\n\n\
             *Commands:*\n\
             • /start - Open main menu\n\
             • /help - Show this help message\n\
             • /cancel - Cancel current request\n\n\
             🚀 *Start* - Request household staff\n\
             ℹ️ *Info* - About Liyu Agency\n\
             ⚙️ *Settings* - Change language\n\n\
             📞 Support: +251-XXX-XXXX"
        }
        K::Cancelled => {
            "❌ *Request Cancelled*\n\n\
             Your service request has been cancelled. No information has been saved.\n\n\
             • Use /start to begin a new request\n\
             • Use /help for assistance"
        }
        K::Fallback => "👋 Hello {user_name}! Please use /start to begin.",
        K::ServiceTypePrompt => {
            "👋 Hello {user_name}! Let's find the perfect service for you! 🏠\n\n\
             Please choose your service type:\n\n\
             ⏰ *Permanent* - Regular ongoing service with a fixed schedule\n\
             🔄 *Temporary* - One-time or short-term flexible service"
        }
        K::ServiceTypeSelected => "✅ *Service type:* {service_type}",
        K::ServicesPrompt => {
            "*What services do you need?*\n\n\
             Tap a service to select it, tap again to remove it. \
             You can choose several, or describe another service with 📝 *Other*.\n\n\
             Press ✅ *Done Selecting* when you're finished."
        }
        K::ServiceAdded => "✅ Added: {service}",
        K::ServiceRemoved => "➖ Removed: {service}",
        K::ServiceExclusive => "✅ {service} covers every household task, so it replaces the other selections.",
        K::SelectionSummary => "🛠️ *Selected:* {services}",
        K::OtherServicePrompt => {
            "📝 *Describe the service you need:*\n\n\
             For example: window washing, ironing, tutoring."
        }
        K::OtherServiceAlreadyListed => "ℹ️ {service} is already in your selection.",
        K::ContactCheck => {
            "👋 *Welcome back!*\n\n\
             We have your details from your last request:\n\n\
             👤 *Name:* {name}\n\
             📞 *Phone:* {phone} {phone_source}{location_line}\n\n\
             Would you like to use this information?"
        }
        K::NamePrompt => {
            "*Great choice! Now let's get your contact information.*\n\n\
             We detected your name from Telegram:\n\
             👤 *{detected_name}*\n\n\
             Would you like to use this name?"
        }
        K::NameManualPrompt => "✏️ *Please enter your full name:*",
        K::NameConfirmed => "✅ *Thank you, {name}!*",
        K::PhonePrompt => {
            "*Now we need your phone number.*\n\n\
             We'll use it to contact you about your service.\n\n\
             How would you like to share your phone number?"
        }
        K::PhoneShareHint => {
            "📱 *Share Your Phone Number*\n\n\
             Press the *📱 Share My Phone Number* button below. \
             Your number will be shared with us automatically."
        }
        K::PhoneManualPrompt => {
            "✏️ *Enter Your Phone Number*\n\n\
             Accepted formats:\n\
             • +251912345678\n\
             • 0912345678\n\
             • 912345678"
        }
        K::PhoneSaved => "✅ *Phone:* {phone} {phone_source}",
        K::LocationPrompt => {
            "📍 *Where should we send our staff?*\n\n\
             Share your location or type your address."
        }
        K::LocationShareHint => {
            "📍 Press the *📍 Share My Location* button below to send your current location."
        }
        K::LocationManualPrompt => {
            "✏️ *Type your address:*\n\n\
             For example: Bole, Addis Ababa, near Edna Mall"
        }
        K::ReviewSummary => {
            "📋 *Review Your Service Request*\n\n\
             👤 *Name:* {name}\n\
             📞 *Phone:* {phone} {phone_source}\n\
             ⚡ *Service Type:* {service_type}\n\
             🛠️ *Services:* {services}{location_line}\n\n\
             Choose an option below:"
        }
        K::Submitted => {
            "🎉 *Success! Request Submitted!* 🎉\n\n\
             Thank you, *{name}*!\n\n\
             • Service Type: {service_type}\n\
             • Services: {services}\n\
             • Contact: {phone}\n\
             • Reference: {reference}\n\n\
             Our team will call you within *24 hours* to discuss your needs."
        }
        K::PostSubmission => "What would you like to do next?",
        K::NameInvalid => "❌ *Invalid name.* Please enter a full name with at least 2 characters.",
        K::PhoneInvalid => {
            "❌ *Invalid phone number.*\n\n\
             Please enter an Ethiopian mobile number. It must start with 9 and have 9 digits \
             (e.g. 0912345678 or +251912345678)."
        }
        K::LocationInvalid => "❌ *Address too short.* Please enter at least 5 characters.",
        K::OtherServiceInvalid => "❌ Please describe the service in at least 3 characters.",
        K::SelectionEmpty => "⚠️ Please select at least one service before continuing.",
        K::UnmatchedChoice => "⚠️ Please choose one of the options below.",
        K::DraftIncomplete => "⚠️ Some details are missing. Please complete them before submitting.",
        K::SubmissionFailed => {
            "⚠️ Sorry, we couldn't submit your request right now. Please try again."
        }
    }
}

fn amharic(key: PromptKey) -> &'static str {
    use PromptKey as K;
    match key {
        K::Welcome => {
            "👋 *ወደ Liyu Agency እንኳን በደህና መጡ!* 🏠\n\n\
             ሰላም {user_name}! እዚህ በመገኘትዎ በጣም ተደስተናል።\n\n\
             ለሁሉም የቤት ውስጥ ፍላጎቶችዎ ከባለሙያ፣ የተረጋገጡ ሰራተኞች ጋር እናገናኝዎታለን።\n\n\
             🚀 *ጀምር* - አገልግሎት ይጠይቁ\n\
             ℹ️ *መረጃ* - ስለ እኛ ይወቁ\n\
             ⚙️ *ቅንብሮች* - ምርጫዎችን ያስተካክሉ\n\n\
             ለመቀጠል ከዚህ በታች አንድ አማራጭ ይምረጡ:"
        }
        K::MainMenu => "🏠 *ዋና ምናሌ*\n\nለመቀጠል ከዚህ በታች አንድ አማራጭ ይምረጡ:",
        K::Info => {
            "ℹ️ *ስለ Liyu Agency* 🏠\n\n\
             Liyu Agency በአዲስ አበባ ቤተሰቦችን ከታመኑ የቤት ሰራተኞች ጋር ያገናኛል።\n\n\
             🛠️ *አገልግሎቶቻችን:*\n\
             • 🧹 ሙሉ የቤት ስራ\n\
             • 🏠 የቤት ፍጽምና\n\
             • 👕 የልብስ ማጠቢያ\n\
             • 🍳 የምግብ አበዳሪ\n\
             • 👶 የህጻን እንክብካቤ\n\
             • 👵 የአዛውንት እንክብካቤ\n\
             • 🐕 የቤት እንስሳት\n\
             • 🌿 የአትክልት ስራ\n\n\
             ✅ ሁሉም ሰራተኞች የተፈተኑ እና የተረጋገጡ ናቸው\n\
             ✅ ተለዋዋጭ ቋሚ እና ጊዜያዊ አማራጮች\n\n\
             📞 ስልክ: +251-XXX-XXXX\n\
             📧 ኢሜይል: info@liyuagency.com\n\
             🕗 ሰዓታት: ከጠዋት 8:00 እስከ ማታ 8:00 (በየቀኑ)\n\n\
             ለመጀመር ዝግጁ ነዎት? ከዋና ምናሌ 🚀 *ጀምር* ን ይጫኑ!"
        }
        K::Settings => {
            "⚙️ *ቅንብሮች*\n\n\
             🌍 *ቋንቋ:* {current_language}\n\n\
             ምን ማስተካከል ይፈልጋሉ?"
        }
        K::LanguagePrompt => "🌍 *ቋንቋ ይምረጡ:*",
        K::LanguageChanged => {
            "✅ *ቋንቋ ተዘምኗል!*\n\n\
             ቋንቋዎ ወደ *{language}* ተቀይሯል።\n\n\
             ወደ ዋና ምናሌ በመመለስ ላይ..."
        }
        K::Help => {
            "🤖 *Liyu Agency ቦት - እገዛ*\n\n\
             *ትእዛዞች:*\n\
             • /start - ዋና ምናሌ ክፈት\n\
             • /help - ይህን የእገዛ መልእክት አሳይ\n\
             • /cancel - የአሁኑን ጥያቄ ሰርዝ\n\n\
             🚀 *ጀምር* - የቤት ሰራተኞችን ይጠይቁ\n\
             ℹ️ *መረጃ* - ስለ Liyu Agency\n\
             ⚙️ *ቅንብሮች* - ቋንቋ ይቀይሩ\n\n\
             📞 ድጋፍ: +251-XXX-XXXX"
        }
        K::Cancelled => {
            "❌ *ጥያቄ ተሰርዟል*\n\n\
             የአገልግሎት ጥያቄዎ ተሰርዟል። ምንም መረጃ አልተቀመጠም።\n\n\
             • አዲስ ጥያቄ ለመጀመር /start ይጠቀሙ\n\
             • ለእገዛ /help ይጠቀሙ"
        }
        K::Fallback => "👋 ሰላም {user_name}! ለመጀመር እባክዎ /start ይጠቀሙ።",
        K::ServiceTypePrompt => {
            "👋 ሰላም {user_name}! ለእርስዎ ተስማሚ የሆነ አገልግሎት እንፈልግ! 🏠\n\n\
             እባክዎ የአገልግሎት አይነትዎን ይምረጡ:\n\n\
             ⏰ *ቋሚ* - መደበኛ ቀጣይ አገልግሎት ቋሚ የጊዜ ሰሌዳ ጋር\n\
             🔄 *ጊዜያዊ* - ለአንድ ጊዜ ወይም አጭር ጊዜ ተለዋዋጭ አገልግሎት"
        }
        K::ServiceTypeSelected => "✅ *የአገልግሎት አይነት:* {service_type}",
        K::ServicesPrompt => {
            "*ምን አገልግሎቶች ይፈልጋሉ?*\n\n\
             ለመምረጥ አገልግሎቱን ይጫኑ፣ ለማስወገድ እንደገና ይጫኑ። \
             ብዙ መምረጥ ወይም በ📝 *ሌላ* ሌላ አገልግሎት መግለጽ ይችላሉ።\n\n\
             ሲጨርሱ ✅ *መርጬ ጨርሻለሁ* ን ይጫኑ።"
        }
        K::ServiceAdded => "✅ ተጨምሯል: {service}",
        K::ServiceRemoved => "➖ ተወግዷል: {service}",
        K::ServiceExclusive => "✅ {service} ሁሉንም የቤት ስራዎች ያካትታል፣ ስለዚህ ሌሎቹን ምርጫዎች ይተካል።",
        K::SelectionSummary => "🛠️ *የተመረጡ:* {services}",
        K::OtherServicePrompt => {
            "📝 *የሚፈልጉትን አገልግሎት ይግለጹ:*\n\n\
             ለምሳሌ: መስኮት ማጽዳት፣ ልብስ መተኮስ፣ ማስጠናት።"
        }
        K::OtherServiceAlreadyListed => "ℹ️ {service} ቀድሞውኑ በምርጫዎ ውስጥ አለ።",
        K::ContactCheck => {
            "👋 *እንኳን ደህና መጡ!*\n\n\
             ካለፈው ጥያቄዎ ያለን መረጃ:\n\n\
             👤 *ስም:* {name}\n\
             📞 *ስልክ:* {phone} {phone_source}{location_line}\n\n\
             ይህን መረጃ መጠቀም ይፈልጋሉ?"
        }
        K::NamePrompt => {
            "*በጣም ጥሩ ምርጫ! አሁን የእርስዎን የመገኛ መረጃ እናግኝ።*\n\n\
             ከቴሌግራም ስምዎን አገኘን:\n\
             👤 *{detected_name}*\n\n\
             ይህን ስም መጠቀም ይፈልጋሉ?"
        }
        K::NameManualPrompt => "✏️ *እባክዎ ሙሉ ስምዎን ያስገቡ:*",
        K::NameConfirmed => "✅ *አመሰግናለሁ {name}!*",
        K::PhonePrompt => {
            "*አሁን የስልክ ቁጥርዎ ያስፈልገናል።*\n\n\
             ስለ አገልግሎትዎ ለማግኘትዎ እንጠቀምበታለን።\n\n\
             የስልክ ቁጥርዎን እንዴት ማጋራት ይፈልጋሉ?"
        }
        K::PhoneShareHint => {
            "📱 *የስልክ ቁጥርዎን ያጋሩ*\n\n\
             ከዚህ በታች ያለውን *📱 ስልክ ቁጥሬን አጋራ* ቁልፍ ይጫኑ። \
             ቁጥርዎ በራስ-ሰር ከእኛ ጋር ይጋራል።"
        }
        K::PhoneManualPrompt => {
            "✏️ *የስልክ ቁጥርዎን ያስገቡ*\n\n\
             የተቀበሉ ቅጾች:\n\
             • +251912345678\n\
             • 0912345678\n\
             • 912345678"
        }
        K::PhoneSaved => "✅ *ስልክ:* {phone} {phone_source}",
        K::LocationPrompt => {
            "📍 *ሰራተኞቻችንን የት እንላክ?*\n\n\
             አካባቢዎን ያጋሩ ወይም አድራሻዎን ይፃፉ።"
        }
        K::LocationShareHint => "📍 የአሁኑን አካባቢዎን ለመላክ ከዚህ በታች ያለውን *📍 አካባቢዬን አጋራ* ቁልፍ ይጫኑ።",
        K::LocationManualPrompt => {
            "✏️ *አድራሻዎን ይፃፉ:*\n\n\
             ለምሳሌ: ቦሌ፣ አዲስ አበባ፣ ኤድና ሞል አጠገብ"
        }
        K::ReviewSummary => {
            "📋 *የአገልግሎት ጥያቄዎን ይገምግሙ*\n\n\
             👤 *ስም:* {name}\n\
             📞 *ስልክ:* {phone} {phone_source}\n\
             ⚡ *የአገልግሎት አይነት:* {service_type}\n\
             🛠️ *አገልግሎቶች:* {services}{location_line}\n\n\
             ከዚህ በታች አንድ አማራጭ ይምረጡ:"
        }
        K::Submitted => {
            "🎉 *ስኬት! ጥያቄ ቀርቧል!* 🎉\n\n\
             አመሰግናለሁ *{name}*!\n\n\
             • የአገልግሎት አይነት: {service_type}\n\
             • አገልግሎቶች: {services}\n\
             • መገኛ: {phone}\n\
             • የማጣቀሻ ቁጥር: {reference}\n\n\
             ቡድናችን በ*24 ሰዓታት* ውስጥ ይደውልልዎታል።"
        }
        K::PostSubmission => "ቀጥሎ ምን ማድረግ ይፈልጋሉ?",
        K::NameInvalid => "❌ *ልክ ያልሆነ ስም።* እባክዎ ቢያንስ 2 ፊደሎች ያለው ሙሉ ስም ያስገቡ።",
        K::PhoneInvalid => {
            "❌ *ልክ ያልሆነ ስልክ ቁጥር።*\n\n\
             እባክዎ የኢትዮጵያ ሞባይል ቁጥር ያስገቡ። ቁጥሩ በ9 መጀመር እና 9 አሃዞች ሊኖረው ይገባል \
             (ለምሳሌ 0912345678 ወይም +251912345678)።"
        }
        K::LocationInvalid => "❌ *አድራሻው በጣም አጭር ነው።* እባክዎ ቢያንስ 5 ፊደሎች ያስገቡ።",
        K::OtherServiceInvalid => "❌ እባክዎ አገልግሎቱን ቢያንስ በ3 ፊደሎች ይግለጹ።",
        K::SelectionEmpty => "⚠️ ከመቀጠልዎ በፊት እባክዎ ቢያንስ አንድ አገልግሎት ይምረጡ።",
        K::UnmatchedChoice => "⚠️ እባክዎ ከዚህ በታች ካሉት አማራጮች አንዱን ይምረጡ።",
        K::DraftIncomplete => "⚠️ አንዳንድ መረጃዎች ይጎድላሉ። ከማስገባትዎ በፊት እባክዎ ያሟሉ።",
        K::SubmissionFailed => "⚠️ ይቅርታ፣ ጥያቄዎን አሁን ማስገባት አልቻልንም። እባክዎ እንደገና ይሞክሩ።",
    }
}
