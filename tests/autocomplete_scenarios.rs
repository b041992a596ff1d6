use form_widgets::{Error, Harness, Result, WidgetConfig};

const LOCATION_FIXTURE: &str = r#"
<!DOCTYPE html>
<html lang="en">
<head><title>Choose location</title></head>
<body>
  <form action="/location" method="post" novalidate>
    <div class="govuk-form-group">
      <label class="govuk-label" for="location">Choose location</label>
      <div id="location-hint" class="govuk-hint">This can be different to where you went before</div>
      <select class="govuk-select" id="location" name="location" aria-describedby="location-hint"
              data-module="hmrc-accessible-autocomplete">
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
    <button class="govuk-button" data-module="govuk-button">Continue</button>
  </form>
</body>
</html>
"#;

const ERROR_FIXTURE: &str = r#"
<div class="govuk-form-group govuk-form-group--error">
  <label class="govuk-label" for="location">Choose location</label>
  <div id="location-hint" class="govuk-hint">This can be different to where you went before</div>
  <p id="location-error" class="govuk-error-message">
    <span class="govuk-visually-hidden">Error:</span> Select a location
  </p>
  <select class="govuk-select govuk-select--error" id="location" name="location"
          aria-describedby="location-hint location-error" data-module="hmrc-accessible-autocomplete">
    <option value="">Choose location</option>
    <option value="london">London</option>
  </select>
</div>
"#;

#[test]
fn describedby_without_polyfill() -> Result<()> {
    let h = Harness::from_html(LOCATION_FIXTURE)?;
    h.assert_attribute(
        "#location",
        "aria-describedby",
        Some("location-hint location__assistiveHint"),
    )?;
    Ok(())
}

#[test]
fn describedby_with_polyfill_applied_after_enhancement() -> Result<()> {
    let mut h = Harness::from_html(LOCATION_FIXTURE)?;

    // A polyfill re-applies its own view of the description chain to the control.
    h.set_attribute(
        "#location",
        "aria-describedby",
        "location-hint location__assistiveHint location__assistiveHint",
    )?;
    h.refresh_autocompletes()?;
    h.init_all()?;

    h.assert_attribute(
        "#location",
        "aria-describedby",
        Some("location-hint location__assistiveHint"),
    )?;
    assert_eq!(h.count("#location__assistiveHint")?, 1);
    Ok(())
}

#[test]
fn error_state_styles_the_enhanced_control() -> Result<()> {
    let h = Harness::from_html(ERROR_FIXTURE)?;
    h.assert_class("#location", "govuk-input--error", true)?;
    h.assert_class(".autocomplete__wrapper", "autocomplete__wrapper--error", true)?;
    h.assert_attribute(
        "#location",
        "aria-describedby",
        Some("location-hint location-error location__assistiveHint"),
    )?;
    h.assert_value("#location", "")?;
    Ok(())
}

#[test]
fn error_describedby_with_polyfill_appending_the_hint_again() -> Result<()> {
    let mut h = Harness::from_html(ERROR_FIXTURE)?;
    h.set_attribute(
        "#location-select",
        "aria-describedby",
        "location-hint location-error location__assistiveHint",
    )?;
    h.init_all()?;
    h.assert_attribute(
        "#location",
        "aria-describedby",
        Some("location-hint location-error location__assistiveHint"),
    )?;
    Ok(())
}

#[test]
fn error_classes_are_not_copied_when_mapping_is_disabled() -> Result<()> {
    let config = WidgetConfig::default().without_error_class_mappings();
    let h = Harness::from_html_with_config(ERROR_FIXTURE, config)?;
    h.assert_class("#location", "govuk-input--error", false)?;
    Ok(())
}

#[test]
fn select_then_type_unknown_place_and_blur() -> Result<()> {
    let mut h = Harness::from_html(LOCATION_FIXTURE)?;
    h.type_text("#location", "Lon")?;
    h.click("#location__listbox li")?;
    h.assert_value("#location-select", "london")?;

    h.type_text("#location", "Bristol")?;
    h.blur("#location")?;
    h.assert_value("#location-select", "")?;
    Ok(())
}

#[test]
fn select_then_retype_same_label_and_blur() -> Result<()> {
    let mut h = Harness::from_html(LOCATION_FIXTURE)?;
    h.type_text("#location", "Lon")?;
    h.click("#location__listbox li")?;
    h.assert_value("#location-select", "london")?;

    h.type_text("#location", "London")?;
    h.blur("#location")?;
    h.assert_value("#location-select", "")?;
    Ok(())
}

#[test]
fn blur_after_fresh_typing_commits_a_unique_label() -> Result<()> {
    let mut h = Harness::from_html(ERROR_FIXTURE)?;
    h.type_text("#location", "london")?;
    h.blur("#location")?;
    h.assert_value("#location-select", "london")?;
    h.assert_value("#location", "London")?;
    Ok(())
}

#[test]
fn invalid_module_names_are_rejected() {
    match WidgetConfig::default().with_autocomplete_module("bad name\"]") {
        Err(Error::Config(message)) => assert!(message.contains("invalid data-module name")),
        other => panic!("expected config error, got: {other:?}"),
    }
}
