#![allow(missing_docs)]

pub(crate) mod form;
pub(crate) mod html;
pub(crate) mod http;

pub(crate) use form::{
    assert_form_error_message, assert_form_input, assert_form_input_with_value,
    assert_form_submit_button, assert_hx_endpoint, must_get_form,
};
pub(crate) use html::{
    assert_valid_html, count_matches, parse_html_document, parse_html_fragment, response_text,
};
pub(crate) use http::{assert_csv_attachment, assert_hx_redirect, assert_status_ok};
