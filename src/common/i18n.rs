// src/common/i18n.rs

use std::collections::HashMap;

pub const DEFAULT_LANG: &str = "en";

// (chave, inglês, tâmil, cingalês)
const MESSAGES: &[(&str, &str, &str, &str)] = &[
    (
        "validation_failed",
        "One or more fields are invalid.",
        "ஒன்று அல்லது அதற்கு மேற்பட்ட புலங்கள் தவறானவை.",
        "ක්ෂේත්‍ර එකක් හෝ කිහිපයක් වලංගු නොවේ.",
    ),
    (
        "email_exists",
        "This e-mail is already in use.",
        "இந்த மின்னஞ்சல் ஏற்கனவே பயன்பாட்டில் உள்ளது.",
        "මෙම විද්‍යුත් තැපෑල දැනටමත් භාවිතයේ ඇත.",
    ),
    (
        "invalid_credentials",
        "Invalid e-mail or password.",
        "மின்னஞ்சல் அல்லது கடவுச்சொல் தவறானது.",
        "විද්‍යුත් තැපෑල හෝ මුරපදය වැරදියි.",
    ),
    (
        "invalid_token",
        "Missing or invalid authentication token.",
        "அங்கீகார டோக்கன் இல்லை அல்லது தவறானது.",
        "සත්‍යාපන ටෝකනය නොමැත හෝ වලංගු නොවේ.",
    ),
    (
        "user_not_found",
        "User not found.",
        "பயனர் கிடைக்கவில்லை.",
        "පරිශීලකයා හමු නොවීය.",
    ),
    (
        "not_found",
        "Record not found ({entity}).",
        "பதிவு கிடைக்கவில்லை ({entity}).",
        "වාර්තාව හමු නොවීය ({entity}).",
    ),
    (
        "masjid_access_denied",
        "You do not have access to this masjid.",
        "இந்த மஸ்ஜிதை அணுக உங்களுக்கு அனுமதி இல்லை.",
        "මෙම පල්ලියට ප්‍රවේශ වීමට ඔබට අවසර නැත.",
    ),
    (
        "masjid_deactivated",
        "This masjid has been deactivated.",
        "இந்த மஸ்ஜித் செயலிழக்கம் செய்யப்பட்டுள்ளது.",
        "මෙම පල්ලිය අක්‍රිය කර ඇත.",
    ),
    (
        "permission_denied",
        "You need the '{perm}' permission for this action.",
        "இந்த செயலுக்கு '{perm}' அனுமதி தேவை.",
        "මෙම ක්‍රියාව සඳහා '{perm}' අවසරය අවශ්‍යයි.",
    ),
    (
        "super_admin_only",
        "Access denied. Only Super Admin can manage users.",
        "அணுகல் மறுக்கப்பட்டது. சூப்பர் நிர்வாகி மட்டுமே பயனர்களை நிர்வகிக்க முடியும்.",
        "ප්‍රවේශය ප්‍රතික්ෂේපිතයි. සුපිරි පරිපාලකට පමණක් පරිශීලකයින් කළමනාකරණය කළ හැක.",
    ),
    (
        "platform_admin_only",
        "Access restricted to platform Super-Admin.",
        "தள சூப்பர் நிர்வாகிக்கு மட்டுமே அணுகல்.",
        "වේදිකා සුපිරි පරිපාලකට පමණක් ප්‍රවේශය.",
    ),
    (
        "cannot_remove_super_admin",
        "The Super Admin cannot be removed.",
        "சூப்பர் நிர்வாகியை நீக்க முடியாது.",
        "සුපිරි පරිපාලක ඉවත් කළ නොහැක.",
    ),
    (
        "invitation_mismatch",
        "This invitation was sent to another e-mail.",
        "இந்த அழைப்பு வேறு மின்னஞ்சலுக்கு அனுப்பப்பட்டது.",
        "මෙම ආරාධනය වෙනත් විද්‍යුත් තැපෑලකට යවා ඇත.",
    ),
    (
        "already_exists",
        "A record with these values already exists.",
        "இந்த மதிப்புகளுடன் ஒரு பதிவு ஏற்கனவே உள்ளது.",
        "මෙම අගයන් සහිත වාර්තාවක් දැනටමත් පවතී.",
    ),
    (
        "invalid_qr",
        "This QR code is not a Smart Masjeedh family code.",
        "இந்த QR குறியீடு ஒரு குடும்பக் குறியீடு அல்ல.",
        "මෙම QR කේතය පවුල් කේතයක් නොවේ.",
    ),
    (
        "invalid_column",
        "Unknown report column.",
        "அறியப்படாத அறிக்கை நெடுவரிசை.",
        "නොදන්නා වාර්තා තීරුවකි.",
    ),
    (
        "missing_table",
        "A database table is missing. Please run the migrations.",
        "தரவுத்தள அட்டவணை இல்லை. தயவுசெய்து migration-ஐ இயக்கவும்.",
        "දත්ත සමුදා වගුවක් නොමැත. කරුණාකර migrations ධාවනය කරන්න.",
    ),
    (
        "internal_error",
        "An unexpected error occurred.",
        "எதிர்பாராத பிழை ஏற்பட்டது.",
        "අනපේක්ෂිත දෝෂයක් සිදුවිය.",
    ),
];

/// Tabela de mensagens traduzidas, indexada por idioma e chave.
#[derive(Debug, Clone)]
pub struct I18nStore {
    messages: HashMap<&'static str, HashMap<&'static str, &'static str>>,
}

impl Default for I18nStore {
    fn default() -> Self {
        let mut messages: HashMap<&'static str, HashMap<&'static str, &'static str>> =
            HashMap::new();
        for (key, en, ta, si) in MESSAGES {
            messages.entry("en").or_default().insert(key, en);
            messages.entry("ta").or_default().insert(key, ta);
            messages.entry("si").or_default().insert(key, si);
        }
        Self { messages }
    }
}

impl I18nStore {
    /// Normaliza o código do idioma. O app antigo gravava "tm" para tâmil.
    pub fn resolve_lang(lang: &str) -> &'static str {
        match lang.to_ascii_lowercase().as_str() {
            "ta" | "tm" => "ta",
            "si" => "si",
            _ => DEFAULT_LANG,
        }
    }

    pub fn translate(&self, lang: &str, key: &str) -> String {
        self.translate_with(lang, key, &[])
    }

    /// Busca a mensagem e substitui os parâmetros `{nome}`.
    /// Ordem de fallback: idioma pedido, inglês, a própria chave.
    pub fn translate_with(&self, lang: &str, key: &str, params: &[(&str, String)]) -> String {
        let lang = Self::resolve_lang(lang);
        let template = self
            .messages
            .get(lang)
            .and_then(|m| m.get(key))
            .or_else(|| self.messages.get(DEFAULT_LANG).and_then(|m| m.get(key)))
            .copied()
            .unwrap_or(key);

        params.iter().fold(template.to_string(), |acc, (name, value)| {
            acc.replace(&format!("{{{}}}", name), value)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_tamil_code_is_accepted() {
        assert_eq!(I18nStore::resolve_lang("tm"), "ta");
        assert_eq!(I18nStore::resolve_lang("TA"), "ta");
        assert_eq!(I18nStore::resolve_lang("fr"), "en");
    }

    #[test]
    fn falls_back_to_english_then_key() {
        let store = I18nStore::default();
        assert_eq!(store.translate("fr", "user_not_found"), "User not found.");
        assert_eq!(store.translate("en", "no_such_key"), "no_such_key");
    }

    #[test]
    fn replaces_named_params() {
        let store = I18nStore::default();
        let msg = store.translate_with("en", "not_found", &[("entity", "family".into())]);
        assert_eq!(msg, "Record not found (family).");
    }

    #[test]
    fn every_key_exists_in_every_language() {
        let store = I18nStore::default();
        for lang in ["en", "ta", "si"] {
            assert_eq!(store.messages[lang].len(), MESSAGES.len());
        }
    }
}
