//! Sitelinks: `schema:Article` nodes for linked wiki pages.

use tracing::warn;

use crate::format::{encode_title, language_tag};
use crate::model::{EntityId, Sitelink};
use crate::serializer::RdfWriter;
use crate::term::{name, node, Iri, Literal, Term};
use crate::vocabulary::{Namespace, Vocabulary};

/// Where a site key points: host, content language and wiki group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    /// Host name, e.g. `en.wikipedia.org`.
    pub host: String,
    /// Content language code, e.g. `en`.
    pub language: String,
    /// Wiki group, e.g. `wikipedia`.
    pub group: &'static str,
}

const SPECIAL_SITES: [(&str, &str, &str); 5] = [
    ("commonswiki", "commons.wikimedia.org", "commons"),
    ("specieswiki", "species.wikimedia.org", "species"),
    ("metawiki", "meta.wikimedia.org", "meta"),
    ("wikidatawiki", "www.wikidata.org", "wikidata"),
    ("mediawikiwiki", "www.mediawiki.org", "mediawiki"),
];

/// Language-edition families: site key suffix, domain and group. The bare
/// `wiki` suffix must come last.
const FAMILIES: [(&str, &str, &str); 8] = [
    ("wikivoyage", "wikivoyage.org", "wikivoyage"),
    ("wikiquote", "wikiquote.org", "wikiquote"),
    ("wikisource", "wikisource.org", "wikisource"),
    ("wikinews", "wikinews.org", "wikinews"),
    ("wikibooks", "wikibooks.org", "wikibooks"),
    ("wikiversity", "wikiversity.org", "wikiversity"),
    ("wiktionary", "wiktionary.org", "wiktionary"),
    ("wiki", "wikipedia.org", "wikipedia"),
];

/// Resolves a Wikimedia site key such as `enwiki` or `dewikivoyage`.
#[must_use]
pub fn resolve_site(key: &str) -> Option<Site> {
    if let Some((_, host, group)) = SPECIAL_SITES.iter().find(|(k, ..)| *k == key) {
        return Some(Site {
            host: (*host).to_owned(),
            language: "en".to_owned(),
            group: *group,
        });
    }
    FAMILIES.iter().find_map(|(suffix, domain, group)| {
        let code = key.strip_suffix(suffix)?;
        if code.is_empty() || !code.bytes().all(|b| b.is_ascii_lowercase() || b == b'_') {
            return None;
        }
        let language = code.replace('_', "-");
        Some(Site {
            host: format!("{language}.{domain}"),
            language,
            group: *group,
        })
    })
}

/// Writes the article node of each sitelink, in input order. Sitelinks to
/// unknown sites are skipped.
pub fn write_sitelinks<'s, I>(out: &mut dyn RdfWriter, vocab: &Vocabulary, entity: &EntityId, sitelinks: I)
where
    I: IntoIterator<Item = &'s Sitelink>,
{
    let about: Term = vocab.entity_uri(entity).into();
    for sitelink in sitelinks {
        let Some(site) = resolve_site(&sitelink.site) else {
            warn!(site = %sitelink.site, entity = %entity, "skipping sitelink to unknown site");
            continue;
        };
        let base = format!("https://{}/", site.host);
        let article = match &sitelink.url {
            Some(url) => url.clone(),
            None => format!("{base}wiki/{}", encode_title(&sitelink.title)),
        };
        let subject: Term = Iri::full(article).into();
        let base: Term = Iri::full(base).into();

        out.triple(&subject, &name(Namespace::Rdf, "type"), &node(Namespace::Schema, "Article"));
        out.triple(&subject, &name(Namespace::Schema, "about"), &about);
        out.triple(
            &subject,
            &name(Namespace::Schema, "inLanguage"),
            &Literal::plain(site.language.as_str()).into(),
        );
        out.triple(&subject, &name(Namespace::Schema, "isPartOf"), &base);
        let title = match language_tag(&site.language) {
            Some(tag) => Literal::lang(sitelink.title.as_str(), tag),
            None => Literal::plain(sitelink.title.as_str()),
        };
        out.triple(&subject, &name(Namespace::Schema, "name"), &title.into());
        for badge in &sitelink.badges {
            out.triple(&subject, &name(Namespace::Wikibase, "badge"), &vocab.entity_uri(badge).into());
        }
        out.triple(
            &base,
            &name(Namespace::Wikibase, "wikiGroup"),
            &Literal::plain(site.group).into(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serializer::{writer, Format};
    use pretty_assertions::assert_eq;

    #[test]
    fn language_editions() {
        let site = resolve_site("enwiki");
        assert_eq!(
            site,
            Some(Site {
                host: "en.wikipedia.org".into(),
                language: "en".into(),
                group: "wikipedia",
            })
        );
        assert_eq!(resolve_site("dewikivoyage").map(|s| s.host).as_deref(), Some("de.wikivoyage.org"));
        assert_eq!(resolve_site("frwiktionary").map(|s| s.group), Some("wiktionary"));
        assert_eq!(
            resolve_site("zh_min_nanwiki").map(|s| s.host).as_deref(),
            Some("zh-min-nan.wikipedia.org")
        );
    }

    #[test]
    fn special_sites() {
        assert_eq!(resolve_site("commonswiki").map(|s| s.group), Some("commons"));
        assert_eq!(resolve_site("wikidatawiki").map(|s| s.host).as_deref(), Some("www.wikidata.org"));
    }

    #[test]
    fn unknown_sites() {
        assert_eq!(resolve_site("wiki"), None);
        assert_eq!(resolve_site("example"), None);
        assert_eq!(resolve_site("EN-wiki"), None);
    }

    #[test]
    fn article_block() {
        let vocab = Vocabulary::wikidata();
        let mut out = writer(Format::Turtle, &vocab);
        let sitelink = Sitelink {
            site: "enwiki".into(),
            title: "Douglas Adams".into(),
            badges: vec![EntityId::from("Q17437796")],
            url: None,
        };
        write_sitelinks(out.as_mut(), &vocab, &EntityId::from("Q42"), [&sitelink]);
        let doc = out.finish();
        let body = doc.split_once("\n\n").map_or("", |(_, b)| b);
        assert_eq!(
            body,
            "<https://en.wikipedia.org/wiki/Douglas_Adams> a schema:Article ;\n\
             \tschema:about wd:Q42 ;\n\
             \tschema:inLanguage \"en\" ;\n\
             \tschema:isPartOf <https://en.wikipedia.org/> ;\n\
             \tschema:name \"Douglas Adams\"@en ;\n\
             \twikibase:badge wd:Q17437796 .\n\n\
             <https://en.wikipedia.org/> wikibase:wikiGroup \"wikipedia\" .\n"
        );
    }
}
