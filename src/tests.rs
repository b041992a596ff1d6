use super::*;


const LOCATION_PAGE: &str = r#"
    <form action="/location" method="post">
      <div class="govuk-form-group">
        <label class="govuk-label" for="location">Choose location</label>
        <div id="location-hint" class="govuk-hint">This can be different to where you went before</div>
        <select class="govuk-select" id="location" name="location"
                aria-describedby="location-hint" data-module="hmrc-accessible-autocomplete">
          <option value="choose" selected>Choose location</option>
          <option value="eastmidlands">East Midlands</option>
          <option value="eastofengland">East of England</option>
          <option value="london">London</option>
          <option value="northeast">North East</option>
          <option value="northwest">North West</option>
          <option value="southeast">South East</option>
          <option value="southwest">South West</option>
          <option value="westmidlands">West Midlands</option>
          <option value="yorkshire">Yorkshire and the Humber</option>
        </select>
      </div>
      <button id="continue" class="govuk-button">Continue</button>
    </form>
    "#;

fn quiet(mut h: Harness) -> Harness {
    h.set_trace_stderr(false);
    h
}

#[test]
fn page_without_modules_loads_untouched() -> Result<()> {
    let h = Harness::from_html("<p id='intro'>Nothing to enhance</p>")?;
    h.assert_text("#intro", "Nothing to enhance")?;
    assert_eq!(h.count(".autocomplete__wrapper")?, 0);
    assert_eq!(h.current_url(), "about:blank");
    assert_eq!(h.history_len(), 1);
    Ok(())
}

#[test]
fn malformed_markup_fails_to_open() {
    match Harness::from_html("<p>unterminated <!-- comment") {
        Err(Error::HtmlParse(_)) => {}
        other => panic!("expected html parse error, got: {other:?}"),
    }
}

#[test]
fn assertion_failures_carry_selector_and_snippet() -> Result<()> {
    let h = Harness::from_html(LOCATION_PAGE)?;
    match h.assert_value("#location-select", "london") {
        Err(Error::AssertionFailed {
            selector,
            expected,
            actual,
            dom_snippet,
        }) => {
            assert_eq!(selector, "#location-select");
            assert_eq!(expected, "london");
            assert_eq!(actual, "choose");
            assert!(dom_snippet.starts_with("<select"));
        }
        other => panic!("unexpected assertion result: {other:?}"),
    }
    Ok(())
}

#[test]
fn missing_selector_is_reported() -> Result<()> {
    let h = Harness::from_html(LOCATION_PAGE)?;
    assert_eq!(
        h.value("#nowhere"),
        Err(Error::SelectorNotFound("#nowhere".into()))
    );
    assert!(!h.exists("#nowhere")?);
    Ok(())
}

#[test]
fn type_text_rejects_non_text_targets() -> Result<()> {
    let mut h = Harness::from_html(LOCATION_PAGE)?;
    match h.type_text("#continue", "x") {
        Err(Error::TypeMismatch { actual, .. }) => assert_eq!(actual, "button"),
        other => panic!("expected type mismatch, got: {other:?}"),
    }
    Ok(())
}

#[test]
fn truncate_chars_marks_cut_text() {
    assert_eq!(truncate_chars("abcdef", 3), "abc...");
    assert_eq!(truncate_chars("abc", 3), "abc");
    assert_eq!(truncate_chars("日本語テキスト", 2), "日本...");
}
