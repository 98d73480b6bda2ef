//! services/api/src/i18n.rs
//!
//! User-facing message bundles for the closed locale set (English and
//! Spanish). Lookups into an unknown locale fall back to the default
//! bundle, so callers never have to handle a missing translation.

/// The locales the site serves. The first entry is the default.
pub const SUPPORTED_LOCALES: [&str; 2] = ["en", "es"];

pub const DEFAULT_LOCALE: &str = "en";

/// Immutable, preloaded bundle of user-facing strings for one locale.
pub struct Bundle {
    pub missing_required_fields: &'static str,
    pub not_configured: &'static str,
    pub duplicate_email: &'static str,
    pub permission_denied: &'static str,
    pub lead_not_found: &'static str,
    pub job_not_found: &'static str,
    pub lead_created: &'static str,
    pub application_submitted: &'static str,
}

static EN: Bundle = Bundle {
    missing_required_fields: "Missing required fields (name, email, message).",
    not_configured: "Database not configured. Please contact the administrator.",
    duplicate_email: "This email already exists in our system.",
    permission_denied: "Database permissions error.",
    lead_not_found: "Lead not found.",
    job_not_found: "Job not found",
    lead_created: "Lead created successfully",
    application_submitted: "Application submitted successfully",
};

static ES: Bundle = Bundle {
    missing_required_fields: "Faltan campos requeridos (nombre, email, mensaje).",
    not_configured: "Base de datos no configurada. Por favor contacta al administrador.",
    duplicate_email: "Este email ya existe en nuestro sistema.",
    permission_denied: "Error de permisos en la base de datos.",
    lead_not_found: "Lead no encontrado.",
    job_not_found: "Trabajo no encontrado",
    lead_created: "Lead creado exitosamente",
    application_submitted: "Aplicación enviada exitosamente",
};

/// Returns the bundle for a locale tag, falling back to the default
/// locale for anything outside the supported set.
pub fn bundle(locale: &str) -> &'static Bundle {
    match locale {
        "es" => &ES,
        _ => &EN,
    }
}

/// True when the tag names a locale the site actually serves.
pub fn is_supported(locale: &str) -> bool {
    SUPPORTED_LOCALES.contains(&locale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_locale_falls_back_to_default() {
        assert_eq!(bundle("fr").job_not_found, bundle(DEFAULT_LOCALE).job_not_found);
    }

    #[test]
    fn spanish_bundle_is_served_for_es() {
        assert_eq!(
            bundle("es").not_configured,
            "Base de datos no configurada. Por favor contacta al administrador."
        );
    }

    #[test]
    fn supported_set_is_closed() {
        assert!(is_supported("en"));
        assert!(is_supported("es"));
        assert!(!is_supported("pt"));
    }
}
