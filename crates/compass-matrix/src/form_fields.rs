use std::collections::BTreeMap;

use lopdf::encryption::{decrypt_object, get_encryption_key};
use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::error::FormFieldError;
use crate::pdf_reader::{PdfSource, decode_pdf_bytes};

/// Fully qualified field name to text value.
pub type FormFields = BTreeMap<String, String>;

const MAX_FIELD_DEPTH: usize = 32;

/// An object together with the indirect object that contains it. Encrypted
/// strings are keyed by that container's id.
type Located<'a> = (&'a Object, Option<ObjectId>);

struct FieldReader<'a> {
    document: &'a Document,
    key: Option<Vec<u8>>,
}

impl<'a> FieldReader<'a> {
    /// `Document::decrypt` leaves strings nested in dictionaries untouched,
    /// so field strings are decrypted here as they are read.
    fn open(document: &'a Document) -> Result<Self, FormFieldError> {
        let key = if document.is_encrypted() {
            let key = get_encryption_key(document, "", true)
                .map_err(|error| FormFieldError::Decrypt(error.to_string()))?;
            Some(key)
        } else {
            None
        };
        Ok(Self { document, key })
    }

    fn resolve(
        &self,
        object: &'a Object,
        owner: Option<ObjectId>,
    ) -> Result<Located<'a>, lopdf::Error> {
        match object {
            Object::Reference(id) => Ok((self.document.get_object(*id)?, Some(*id))),
            other => Ok((other, owner)),
        }
    }

    fn text_of(&self, object: &Object, owner: Option<ObjectId>) -> Option<String> {
        let Object::String(bytes, _) = object else {
            return None;
        };
        let plain = match (&self.key, owner) {
            (Some(key), Some(owner)) => decrypt_object(key, owner, object).ok()?,
            _ => bytes.clone(),
        };
        Some(decode_pdf_bytes(Some("PDFDocEncoding"), &plain))
    }

    fn acro_form_fields(&self) -> Result<Vec<Located<'a>>, lopdf::Error> {
        let (root, root_id) = self.resolve(self.document.trailer.get(b"Root")?, None)?;
        let Ok(acro_form) = root.as_dict()?.get(b"AcroForm") else {
            return Ok(Vec::new());
        };
        let (acro_form, form_id) = self.resolve(acro_form, root_id)?;
        let Ok(fields) = acro_form.as_dict()?.get(b"Fields") else {
            return Ok(Vec::new());
        };
        let (fields, fields_id) = self.resolve(fields, form_id)?;
        Ok(fields
            .as_array()?
            .iter()
            .map(|field| (field, fields_id))
            .collect())
    }

    fn child_fields(
        &self,
        field: &'a Dictionary,
        owner: Option<ObjectId>,
    ) -> Vec<(&'a Dictionary, Option<ObjectId>)> {
        let Ok((kids, kids_owner)) = field
            .get(b"Kids")
            .and_then(|kids| self.resolve(kids, owner))
        else {
            return Vec::new();
        };
        let Ok(kids) = kids.as_array() else {
            return Vec::new();
        };

        // Kids without a partial name are widget annotations of this field.
        kids.iter()
            .filter_map(|kid| {
                let (kid, kid_owner) = self.resolve(kid, kids_owner).ok()?;
                Some((kid.as_dict().ok()?, kid_owner))
            })
            .filter(|(kid, _)| kid.has(b"T"))
            .collect()
    }

    fn collect_text_fields(
        &self,
        field: &'a Dictionary,
        owner: Option<ObjectId>,
        parent_name: Option<&str>,
        inherited_type: Option<&[u8]>,
        depth: usize,
        out: &mut FormFields,
    ) {
        if depth > MAX_FIELD_DEPTH {
            return;
        }

        let partial_name = field
            .get(b"T")
            .ok()
            .and_then(|name| self.text_of(name, owner));
        let full_name = match (parent_name, partial_name) {
            (Some(parent), Some(partial)) => format!("{parent}.{partial}"),
            (None, Some(partial)) => partial,
            (Some(parent), None) => parent.to_string(),
            (None, None) => return,
        };
        let field_type = field
            .get(b"FT")
            .and_then(Object::as_name)
            .ok()
            .or(inherited_type);

        let children = self.child_fields(field, owner);
        if !children.is_empty() {
            for (child, child_owner) in children {
                self.collect_text_fields(
                    child,
                    child_owner,
                    Some(&full_name),
                    field_type,
                    depth + 1,
                    out,
                );
            }
            return;
        }

        if field_type != Some(b"Tx".as_slice()) {
            return;
        }

        let value = field
            .get(b"V")
            .ok()
            .and_then(|value| self.resolve(value, owner).ok())
            .and_then(|(value, value_owner)| self.text_of(value, value_owner))
            .unwrap_or_default();
        out.insert(full_name, value);
    }
}

/// Reads the values of the document's text form fields. Button, choice and
/// signature fields are skipped.
pub fn extract_form_fields(source: PdfSource<'_>) -> Result<FormFields, FormFieldError> {
    let document = source.load()?;
    let reader = FieldReader::open(&document)?;

    let mut fields = FormFields::new();
    for (field, owner) in reader.acro_form_fields()? {
        let Ok((field, owner)) = reader.resolve(field, owner) else {
            continue;
        };
        let Ok(field) = field.as_dict() else {
            continue;
        };
        reader.collect_text_fields(field, owner, None, None, 0, &mut fields);
    }

    tracing::debug!(
        count = fields.len(),
        encrypted = reader.key.is_some(),
        "read text form fields"
    );
    Ok(fields)
}
