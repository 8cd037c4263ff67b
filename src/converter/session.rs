use std::time::Duration;

use async_trait::async_trait;
use fantoccini::{Client, ClientBuilder, Locator, elements::Element, error::CmdError};
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use tokio::time::timeout;

use crate::{
    config,
    converter::{ConversionError, ConvertDriver, ConvertSession, Step},
    types::MatchedTrack,
    youtube,
};

/// WebDriver-backed conversion driver.
///
/// Holds the converter's DOM contract (selectors, format value) and wait
/// bounds, all read once from configuration. Opening a session creates a
/// fresh WebDriver session against the configured endpoint, so concurrent
/// tracks never share browser state.
#[derive(Debug, Clone)]
pub struct WebConverter {
    webdriver_url: String,
    converter_url: String,
    format_selector: String,
    format_value: String,
    convert_selector: String,
    link_selector: String,
    panel_selector: String,
    page_timeout: Duration,
    link_timeout: Duration,
}

impl WebConverter {
    pub fn from_env() -> Self {
        WebConverter {
            webdriver_url: config::webdriver_url(),
            converter_url: config::converter_url(),
            format_selector: config::converter_format_selector(),
            format_value: config::converter_format_value(),
            convert_selector: config::converter_convert_selector(),
            link_selector: config::converter_link_selector(),
            panel_selector: config::converter_panel_selector(),
            page_timeout: config::converter_page_timeout(),
            link_timeout: config::converter_link_timeout(),
        }
    }
}

#[async_trait]
impl ConvertDriver for WebConverter {
    type Session = ConverterPage;

    async fn open(&self) -> Result<ConverterPage, ConversionError> {
        let client = ClientBuilder::native()
            .connect(&self.webdriver_url)
            .await
            .map_err(|e| ConversionError::Driver(e.to_string()))?;

        Ok(ConverterPage {
            client,
            config: self.clone(),
        })
    }
}

/// One conversion page, exclusively owned by one in-flight track.
pub struct ConverterPage {
    client: Client,
    config: WebConverter,
}

impl ConverterPage {
    /// Waits for an element with the step's bound. When the wait expires,
    /// the result panel decides whether the timeout is worth retrying.
    async fn wait_for(
        &self,
        selector: &str,
        bound: Duration,
        step: Step,
    ) -> Result<Element, ConversionError> {
        match self
            .client
            .wait()
            .at_most(bound)
            .for_element(Locator::Css(selector))
            .await
        {
            Ok(element) => Ok(element),
            Err(CmdError::WaitTimeout) => {
                let panel_present = self
                    .client
                    .find(Locator::Css(&self.config.panel_selector))
                    .await
                    .is_ok();
                Err(classify_timeout(step, panel_present))
            }
            Err(e) => Err(driver_error(e)),
        }
    }
}

#[async_trait]
impl ConvertSession for ConverterPage {
    async fn convert(&mut self, track: &MatchedTrack) -> Result<String, ConversionError> {
        let video_url = youtube::watch_url(&track.video_id);
        let encoded = utf8_percent_encode(&video_url, NON_ALPHANUMERIC).to_string();
        let target = format!("{}?url={}", self.config.converter_url, encoded);

        // Navigating. A slow load is always worth a fresh attempt.
        match timeout(self.config.page_timeout, self.client.goto(&target)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(driver_error(e)),
            Err(_) => return Err(ConversionError::Timeout {
                step: Step::Navigating,
            }),
        }

        // FormatSelecting
        let format_control = self
            .wait_for(
                &self.config.format_selector,
                self.config.page_timeout,
                Step::FormatSelecting,
            )
            .await?;
        format_control
            .select_by_value(&self.config.format_value)
            .await
            .map_err(driver_error)?;

        // Converting. A single activation, no wait of its own.
        self.client
            .find(Locator::Css(&self.config.convert_selector))
            .await
            .map_err(driver_error)?
            .click()
            .await
            .map_err(driver_error)?;

        // AwaitingLink
        let link = self
            .wait_for(
                &self.config.link_selector,
                self.config.link_timeout,
                Step::AwaitingLink,
            )
            .await?;

        // LinkReady
        let href = link.attr("href").await.map_err(driver_error)?;
        href.ok_or_else(|| {
            ConversionError::Failed("download control carries no link".to_string())
        })
    }

    async fn close(self) {
        let _ = self.client.close().await;
    }
}

/// Decides whether an expired wait is recoverable.
///
/// A visible result panel means the page finished rendering and the
/// conversion genuinely failed; an absent panel means the page may still be
/// working and the attempt can be retried.
pub fn classify_timeout(step: Step, panel_present: bool) -> ConversionError {
    if panel_present {
        ConversionError::Failed(format!("converter reported failure while {}", step))
    } else {
        ConversionError::Timeout { step }
    }
}

fn driver_error(err: CmdError) -> ConversionError {
    ConversionError::Driver(err.to_string())
}
